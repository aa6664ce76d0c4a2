//! Mean-reversion half-life from a discretised Ornstein-Uhlenbeck fit.
//!
//! Regress the increments `Δy[t] = y[t] - y[t-1]` on the lagged level
//! `y[t-1]`. The slope β is the discrete reversion coefficient, θ = -β, and
//! the half-life is `ln(2) / θ` steps of the input series.

use crate::error::{ensure_min_len, StatsError, StatsResult};
use crate::math::regression::simple_linear_regression;
use serde::Serialize;
use std::f64::consts::LN_2;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HalfLifeResult {
    /// Steps for a deviation from equilibrium to decay by half
    pub periods: f64,
    /// Reversion speed θ = -β
    pub theta: f64,
}

/// Estimate the half-life of mean reversion.
///
/// # Errors
/// - `InsufficientData` for fewer than 2 observations (the regression itself
///   needs two increments, so 2-point series fail there too)
/// - `RankDeficient` if the lagged level is constant
/// - `NotMeanReverting` when β ≥ 0
pub fn half_life(series: &[f64]) -> StatsResult<HalfLifeResult> {
    ensure_min_len(series.len(), 2)?;

    let lagged = &series[..series.len() - 1];
    let increments: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let fit = simple_linear_regression(lagged, &increments)?;
    let beta = fit.slope;

    if beta >= 0.0 {
        debug!(beta, "Lag slope is non-negative, no reversion");
        return Err(StatsError::NotMeanReverting { slope: beta });
    }

    let theta = -beta;
    let periods = LN_2 / theta;
    if !periods.is_finite() {
        return Err(StatsError::NumericalFailure(
            "half-life is not finite".to_string(),
        ));
    }

    Ok(HalfLifeResult { periods, theta })
}
