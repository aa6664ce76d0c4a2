//! Pairwise cointegration command handler.

use super::{load_bars, symbol_for};
use crate::analysis::{cointegration_test_both, half_life, AdfTest, PairCointegrationResult};
use crate::cli::CointegrateCliConfig;
use crate::series::{align_pair, log_spread};
use serde::Serialize;
use tracing::{info, warn};

/// One regression ordering, without the residual vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderingSummary {
    pub dependent: String,
    pub independent: String,
    pub hedge_ratio: f64,
    pub statistic: f64,
    pub is_cointegrated: bool,
}

impl OrderingSummary {
    fn new(dependent: &str, independent: &str, result: &PairCointegrationResult) -> Self {
        Self {
            dependent: dependent.to_string(),
            independent: independent.to_string(),
            hedge_ratio: result.hedge_ratio,
            statistic: result.statistic,
            is_cointegrated: result.is_cointegrated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CointegrationReport {
    pub observations: usize,
    pub orderings: [OrderingSummary; 2],
    pub any_cointegrated: bool,
    /// Half-life of ln(left) - ln(right), when that spread mean-reverts
    pub log_spread_half_life: Option<f64>,
}

/// Run the `cointegrate` command.
///
/// # Errors
/// Returns error if either file cannot be loaded or the test fails.
pub fn run_cointegrate(config: &CointegrateCliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let left_symbol = symbol_for(&config.left);
    let right_symbol = symbol_for(&config.right);
    let report = cointegrate_files(config)?;

    info!(
        left = %left_symbol,
        right = %right_symbol,
        observations = report.observations,
        cointegrated = report.any_cointegrated,
        "Pairwise cointegration complete"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cointegrate_files(
    config: &CointegrateCliConfig,
) -> Result<CointegrationReport, Box<dyn std::error::Error>> {
    let left_symbol = symbol_for(&config.left);
    let right_symbol = symbol_for(&config.right);
    let left = load_bars(&config.left)?;
    let right = load_bars(&config.right)?;

    let aligned = align_pair(&left, &right, config.field);
    let dropped = left.len().max(right.len()) - aligned.left.len();
    if dropped > 0 {
        warn!(dropped, "Bars without a common timestamp were dropped");
    }

    let oracle = AdfTest::new().with_significance(config.significance);
    let both = cointegration_test_both(&aligned.left, &aligned.right, config.lag, &oracle)?;

    let log_spread_half_life = match half_life(&log_spread(&aligned.left, &aligned.right)) {
        Ok(result) => Some(result.periods),
        Err(e) => {
            warn!(error = %e, "No half-life for the log spread");
            None
        }
    };

    Ok(CointegrationReport {
        observations: aligned.left.len(),
        orderings: [
            OrderingSummary::new(&right_symbol, &left_symbol, &both.y_on_x),
            OrderingSummary::new(&left_symbol, &right_symbol, &both.x_on_y),
        ],
        any_cointegrated: both.any_cointegrated(),
        log_spread_half_life,
    })
}
