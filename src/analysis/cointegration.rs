//! Pairwise (Engle-Granger style) cointegration test
//!
//! 1. Regress `y` on `x` by OLS; the slope is the hedge ratio β
//! 2. Form the spread `r[i] = y[i] - β * x[i]` (the fitted intercept is dropped)
//! 3. Submit the spread to a [`StationarityOracle`]
//!
//! Order matters: swapping `x` and `y` changes β and can change the verdict.
//! Callers that want a symmetric answer should run both orderings, see
//! [`cointegration_test_both`].

use crate::analysis::stationarity::StationarityOracle;
use crate::error::{ensure_min_len, ensure_same_len, StatsResult};
use crate::math::regression::simple_linear_regression;
use serde::Serialize;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCointegrationResult {
    pub is_cointegrated: bool,
    /// Raw statistic from the stationarity test on the spread
    pub statistic: f64,
    /// Slope from regressing `y` on `x`
    pub hedge_ratio: f64,
    /// Spread `y - hedge_ratio * x`
    pub residuals: Vec<f64>,
}

/// Test whether `y - βx` is stationary.
///
/// # Errors
/// - `LengthMismatch` / `InsufficientData` (fewer than 2 points) from the inputs
/// - `RankDeficient` if `x` is constant
/// - Whatever the oracle reports for the spread (e.g. too short for `lag`)
pub fn cointegration_test(
    x: &[f64],
    y: &[f64],
    lag: usize,
    oracle: &dyn StationarityOracle,
) -> StatsResult<PairCointegrationResult> {
    ensure_same_len(x, y)?;
    ensure_min_len(x.len(), 2)?;

    let hedge_ratio = simple_linear_regression(x, y)?.slope;
    let residuals: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| yi - hedge_ratio * xi)
        .collect();

    let verdict = oracle.test(&residuals, lag)?;

    trace!(
        hedge_ratio,
        statistic = verdict.statistic,
        cointegrated = verdict.is_stationary,
        "Pair cointegration test complete"
    );

    Ok(PairCointegrationResult {
        is_cointegrated: verdict.is_stationary,
        statistic: verdict.statistic,
        hedge_ratio,
        residuals,
    })
}

/// Results of both regression orderings for one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidirectionalCointegration {
    /// `y` regressed on `x`
    pub y_on_x: PairCointegrationResult,
    /// `x` regressed on `y`
    pub x_on_y: PairCointegrationResult,
}

impl BidirectionalCointegration {
    /// True if either ordering finds a stationary spread.
    pub fn any_cointegrated(&self) -> bool {
        self.y_on_x.is_cointegrated || self.x_on_y.is_cointegrated
    }

    /// The ordering with the more negative statistic.
    pub fn strongest(&self) -> &PairCointegrationResult {
        if self.x_on_y.statistic < self.y_on_x.statistic {
            &self.x_on_y
        } else {
            &self.y_on_x
        }
    }
}

/// Run the pairwise test in both orderings.
pub fn cointegration_test_both(
    x: &[f64],
    y: &[f64],
    lag: usize,
    oracle: &dyn StationarityOracle,
) -> StatsResult<BidirectionalCointegration> {
    Ok(BidirectionalCointegration {
        y_on_x: cointegration_test(x, y, lag, oracle)?,
        x_on_y: cointegration_test(y, x, lag, oracle)?,
    })
}
