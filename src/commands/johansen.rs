//! Johansen command handler.

use super::{load_bars, symbol_for};
use crate::analysis::{JohansenResult, JohansenTest};
use crate::cli::JohansenCliConfig;
use crate::series::align_many;
use crate::types::BarRecord;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JohansenReport {
    pub symbols: Vec<String>,
    pub rows: usize,
    pub lag: usize,
    #[serde(flatten)]
    pub result: JohansenResult,
}

/// Run the `johansen` command.
///
/// # Errors
/// Returns error if any file cannot be loaded or the test fails.
pub fn run_johansen(config: &JohansenCliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = johansen_files(config)?;
    info!(
        series = report.symbols.len(),
        rows = report.rows,
        trace = report.result.trace_statistic,
        cointegrated = report.result.is_cointegrated,
        "Johansen test complete"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn johansen_files(
    config: &JohansenCliConfig,
) -> Result<JohansenReport, Box<dyn std::error::Error>> {
    config.validate()?;

    let symbols: Vec<String> = config.bars.iter().map(|p| symbol_for(p)).collect();
    let loaded = config
        .bars
        .iter()
        .map(|p| load_bars(p))
        .collect::<Result<Vec<Vec<BarRecord>>, _>>()?;
    let inputs: Vec<&[BarRecord]> = loaded.iter().map(|b| b.as_slice()).collect();

    let aligned = align_many(&inputs, config.field);
    let longest = loaded.iter().map(Vec::len).max().unwrap_or(0);
    if aligned.timestamps.len() < longest {
        warn!(
            kept = aligned.timestamps.len(),
            longest, "Bars without a common timestamp were dropped"
        );
    }

    let columns: Vec<&[f64]> = aligned.series.iter().map(|s| s.as_slice()).collect();
    let result = JohansenTest::new()
        .with_critical_value(config.critical_value)
        .run(&columns, config.lag)?;

    Ok(JohansenReport {
        symbols,
        rows: aligned.timestamps.len(),
        lag: config.lag,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{bars_from_closes, write_bars};
    use crate::error::StatsError;
    use crate::types::PriceField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use std::path::PathBuf;

    fn config(bars: Vec<PathBuf>) -> JohansenCliConfig {
        JohansenCliConfig {
            bars,
            field: PriceField::Close,
            lag: 1,
            critical_value: 15.41,
        }
    }

    #[test]
    fn test_johansen_files_cointegrated() {
        let mut rng = StdRng::seed_from_u64(17);
        let step = Normal::new(0.0, 1.0).unwrap();
        let noise = Normal::new(0.0, 0.5).unwrap();
        let mut level = 50.0;
        let base: Vec<f64> = (0..300)
            .map(|_| {
                level += step.sample(&mut rng);
                level
            })
            .collect();
        let follower: Vec<f64> = base.iter().map(|v| v + noise.sample(&mut rng)).collect();

        let a = write_bars("johansen_a", &bars_from_closes(&base));
        let b = write_bars("johansen_b", &bars_from_closes(&follower));
        let report = johansen_files(&config(vec![a, b])).unwrap();

        assert_eq!(report.symbols, vec!["johansen_a", "johansen_b"]);
        assert_eq!(report.rows, 300);
        assert_eq!(report.result.eigenvalues.len(), 2);
        assert!(report.result.is_cointegrated);
    }

    #[test]
    fn test_single_file_rejected() {
        let a = write_bars("johansen_single", &bars_from_closes(&[1.0, 2.0, 3.0]));
        assert!(johansen_files(&config(vec![a])).is_err());
    }

    #[test]
    fn test_short_overlap_is_insufficient() {
        let a = write_bars("johansen_short_a", &bars_from_closes(&[1.0, 2.0, 4.0, 3.0]));
        let b = write_bars("johansen_short_b", &bars_from_closes(&[2.0, 1.0, 3.0, 5.0]));
        let err = johansen_files(&config(vec![a, b])).unwrap_err();
        let stats = err.downcast_ref::<StatsError>().unwrap();
        assert!(matches!(stats, StatsError::InsufficientData { .. }));
    }
}
