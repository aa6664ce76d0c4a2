//! Single-series analysis command handler.

use super::{load_bars, symbol_for};
use crate::analysis::{
    half_life, hurst_exponent, AdfTest, HalfLifeResult, HurstResult, StationarityOracle,
    StationarityVerdict,
};
use crate::cli::AnalyzeCliConfig;
use crate::error::StatsResult;
use crate::math::descriptive::{bollinger_bands_with_width, mean, std_dev, variance};
use crate::series::extract;
use crate::strategy::{BandSignal, BollingerReversion};
use serde::Serialize;
use tracing::{info, warn};

/// Most recent Bollinger band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandSnapshot {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
}

/// Everything `analyze` reports for one series. Estimators that fail leave
/// their field empty and add a line to `errors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub observations: usize,
    pub mean: Option<f64>,
    pub variance: Option<f64>,
    pub std_dev: Option<f64>,
    pub hurst: Option<HurstResult>,
    /// False when the Hurst exponent falls outside (0, 1) and should not be trusted
    pub hurst_well_behaved: Option<bool>,
    pub half_life: Option<HalfLifeResult>,
    pub stationarity: Option<StationarityVerdict>,
    pub latest_band: Option<BandSnapshot>,
    pub signal: Option<BandSignal>,
    pub errors: Vec<String>,
}

impl AnalysisReport {
    fn failed(symbol: String, error: String) -> Self {
        Self {
            symbol,
            observations: 0,
            mean: None,
            variance: None,
            std_dev: None,
            hurst: None,
            hurst_well_behaved: None,
            half_life: None,
            stationarity: None,
            latest_band: None,
            signal: None,
            errors: vec![error],
        }
    }
}

fn record<T>(symbol: &str, errors: &mut Vec<String>, label: &str, result: StatsResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(symbol, estimator = label, error = %e, "Estimator failed");
            errors.push(format!("{}: {}", label, e));
            None
        }
    }
}

/// Run every single-series estimator over `series`.
pub fn analyze_series(
    symbol: &str,
    series: &[f64],
    config: &AnalyzeCliConfig,
    oracle: &dyn StationarityOracle,
) -> AnalysisReport {
    let mut errors = Vec::new();

    let mean = record(symbol, &mut errors, "mean", mean(series));
    let variance = record(symbol, &mut errors, "variance", variance(series));
    let std_dev = record(symbol, &mut errors, "std_dev", std_dev(series));
    let hurst = record(symbol, &mut errors, "hurst", hurst_exponent(series));
    let half_life = record(symbol, &mut errors, "half_life", half_life(series));
    let stationarity = record(symbol, &mut errors, "adf", oracle.test(series, config.lag));

    let hurst_well_behaved = hurst.as_ref().map(HurstResult::is_well_behaved);
    if hurst_well_behaved == Some(false) {
        warn!(symbol, "Hurst exponent outside (0, 1), low confidence");
    }

    // Too few observations for a band is a Hold, not an error
    let strategy = BollingerReversion::new(config.window).with_num_std(config.num_std);
    let signal = record(symbol, &mut errors, "bollinger", strategy.get_latest_signal(series));
    let latest_band = if series.len() >= config.window {
        bollinger_bands_with_width(series, config.window, config.num_std)
            .ok()
            .and_then(|b| b.latest())
            .map(|(lower, middle, upper)| BandSnapshot {
                lower,
                middle,
                upper,
            })
    } else {
        None
    };

    AnalysisReport {
        symbol: symbol.to_string(),
        observations: series.len(),
        mean,
        variance,
        std_dev,
        hurst,
        hurst_well_behaved,
        half_life,
        stationarity,
        latest_band,
        signal,
        errors,
    }
}

/// Run the `analyze` command.
///
/// # Errors
/// Returns error on invalid arguments or if the report cannot be serialized.
/// Unreadable files are reported per file.
pub fn run_analyze(config: &AnalyzeCliConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let oracle = AdfTest::new().with_significance(config.significance);

    let mut reports = Vec::with_capacity(config.bars.len());
    for path in &config.bars {
        let symbol = symbol_for(path);
        let bars = match load_bars(path) {
            Ok(bars) => bars,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Skipping unreadable bar file");
                reports.push(AnalysisReport::failed(symbol, e.to_string()));
                continue;
            }
        };

        let series = extract(&bars, config.field);
        info!(symbol = %symbol, bars = series.len(), field = %config.field, "Analyzing series");
        reports.push(analyze_series(&symbol, &series, config, &oracle));
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Significance;
    use crate::commands::test_support::{bars_from_closes, write_bars};
    use crate::types::PriceField;
    use std::path::PathBuf;

    fn config(bars: Vec<PathBuf>) -> AnalyzeCliConfig {
        AnalyzeCliConfig {
            bars,
            field: PriceField::Close,
            window: 5,
            num_std: 2.0,
            lag: 1,
            significance: Significance::FivePercent,
        }
    }

    fn mean_reverting(n: usize) -> Vec<f64> {
        // Damped oscillation around 100
        (0..n)
            .map(|i| 100.0 + 5.0 * (-0.3f64).powi((i % 7) as i32) + ((i * 37) % 11) as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_analyze_series_populates_report() {
        let series = mean_reverting(120);
        let report = analyze_series("TEST", &series, &config(vec![]), &AdfTest::new());

        assert_eq!(report.symbol, "TEST");
        assert_eq!(report.observations, 120);
        assert!(report.mean.is_some());
        assert!(report.hurst.is_some());
        assert!(report.stationarity.is_some());
        assert!(report.latest_band.is_some());
        assert!(report.signal.is_some());
    }

    #[test]
    fn test_constant_series_reports_errors() {
        let series = vec![42.0; 30];
        let report = analyze_series("FLAT", &series, &config(vec![]), &AdfTest::new());

        assert_eq!(report.mean, Some(42.0));
        assert_eq!(report.variance, Some(0.0));
        assert!(report.hurst.is_none());
        assert!(report.half_life.is_none());
        assert!(report.stationarity.is_none());
        assert!(report.errors.iter().any(|e| e.starts_with("hurst")));
        assert!(report.errors.iter().any(|e| e.starts_with("half_life")));
        // Zero-width band: the last price sits on both bands
        assert_eq!(report.signal, Some(BandSignal::Sell));
    }

    #[test]
    fn test_empty_series() {
        let report = analyze_series("EMPTY", &[], &config(vec![]), &AdfTest::new());
        assert_eq!(report.observations, 0);
        assert!(report.mean.is_none());
        assert_eq!(report.signal, Some(BandSignal::Hold));
        assert!(!report.errors.iter().any(|e| e.starts_with("bollinger")));
        assert!(report.errors.iter().any(|e| e.starts_with("mean")));
    }

    #[test]
    fn test_short_series_signal_is_hold() {
        let report = analyze_series("SHORT", &[1.0, 2.0, 3.0], &config(vec![]), &AdfTest::new());
        assert_eq!(report.signal, Some(BandSignal::Hold));
        assert!(report.latest_band.is_none());
        assert!(!report.errors.iter().any(|e| e.starts_with("bollinger")));
    }

    #[test]
    fn test_hurst_confidence_flag_follows_exponent() {
        let series = mean_reverting(120);
        let report = analyze_series("TEST", &series, &config(vec![]), &AdfTest::new());
        let hurst = report.hurst.unwrap();
        assert_eq!(report.hurst_well_behaved, Some(hurst.is_well_behaved()));

        let flat = analyze_series("FLAT", &[42.0; 30], &config(vec![]), &AdfTest::new());
        assert_eq!(flat.hurst_well_behaved, None);
    }

    #[test]
    fn test_run_analyze_tolerates_missing_file() {
        let good = write_bars("analyze_good", &bars_from_closes(&mean_reverting(60)));
        let missing = PathBuf::from("/nonexistent/missing.json");
        assert!(run_analyze(&config(vec![good, missing])).is_ok());
    }

    #[test]
    fn test_run_analyze_rejects_zero_window() {
        let mut cfg = config(vec![PathBuf::from("a.json")]);
        cfg.window = 0;
        assert!(run_analyze(&cfg).is_err());
    }
}
