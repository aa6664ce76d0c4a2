//! Pair screening command handler.

use super::{load_bars, symbol_for};
use crate::analysis::AdfTest;
use crate::cli::ScreenCliConfig;
use crate::discovery::{screen_pairs, CandidatePair, ScreeningConfig};
use crate::series::align_many;
use crate::types::BarRecord;
use std::collections::HashMap;
use tracing::{info, warn};

/// Run the `screen` command.
///
/// Unreadable files are skipped with a warning. All surviving series are
/// aligned on their common timestamps before screening.
///
/// # Errors
/// Returns error on invalid arguments or config, when two files share a
/// symbol (file stem), when fewer than two files load, or if the output file
/// cannot be written.
pub fn run_screen(config: &ScreenCliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let results = screen_files(config)?;

    if results.is_empty() {
        warn!("No pairs found matching criteria");
    } else {
        println!(
            "\n{:<24} | {:>6} | {:>8} | {:>9} | {:>9} | {:>6}",
            "Pair", "Corr", "Hedge", "Statistic", "Half-life", "Hurst"
        );
        println!("{}", "-".repeat(76));
        for pair in &results {
            println!(
                "{:<24} | {:>6.3} | {:>8.4} | {:>9.2} | {:>9.1} | {:>6}",
                format!("{}/{}", pair.dependent, pair.independent),
                pair.correlation,
                pair.hedge_ratio,
                pair.statistic,
                pair.half_life,
                pair.hurst
                    .map(|h| format!("{:.2}", h))
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
    }

    if let Some(output) = &config.output {
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(output, &json)?;
        info!(path = %output.display(), pairs = results.len(), "Results saved");
    }
    Ok(())
}

fn screen_files(config: &ScreenCliConfig) -> Result<Vec<CandidatePair>, Box<dyn std::error::Error>> {
    config.validate()?;
    let screening = match &config.config {
        Some(path) => ScreeningConfig::from_file(path)?,
        None => ScreeningConfig::default(),
    };

    let mut symbols = Vec::new();
    let mut loaded: Vec<Vec<BarRecord>> = Vec::new();
    for path in &config.bars {
        match load_bars(path) {
            Ok(bars) => {
                let symbol = symbol_for(path);
                if symbols.contains(&symbol) {
                    return Err(format!(
                        "duplicate symbol {} from {}: file stems must be unique",
                        symbol,
                        path.display()
                    )
                    .into());
                }
                symbols.push(symbol);
                loaded.push(bars);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable bar file"),
        }
    }
    if loaded.len() < 2 {
        return Err(format!("need at least 2 readable bar files, got {}", loaded.len()).into());
    }

    let inputs: Vec<&[BarRecord]> = loaded.iter().map(|b| b.as_slice()).collect();
    let aligned = align_many(&inputs, config.field);
    info!(
        symbols = symbols.len(),
        rows = aligned.timestamps.len(),
        "Universe aligned"
    );

    let prices: HashMap<String, Vec<f64>> = symbols.into_iter().zip(aligned.series).collect();
    let oracle = AdfTest::new().with_significance(screening.significance);
    Ok(screen_pairs(&prices, &screening, &oracle))
}
