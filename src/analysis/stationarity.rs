//! Augmented Dickey-Fuller (ADF) stationarity test
//!
//! The estimators depend on stationarity testing only through the
//! [`StationarityOracle`] trait, so callers can inject any unit-root routine.
//! [`AdfTest`] is the bundled implementation.
//!
//! # Mathematical Foundation
//! Under H0 (unit root): y[t] = y[t-1] + ε  (non-stationary random walk)
//! Under H1 (stationary): y[t] = ρ*y[t-1] + ε where |ρ| < 1
//!
//! We fit: Δy[t] = α + γ*y[t-1] + Σ δ_j*Δy[t-j] + ε   (j = 1..=lag)
//! where γ = ρ - 1. If the t-statistic of γ is below the critical value we
//! reject H0 and treat the series as stationary.

use crate::error::{ensure_min_len, StatsError, StatsResult};
use crate::math::regression::least_squares;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Outcome of a unit-root test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationarityVerdict {
    pub is_stationary: bool,
    /// Test statistic; more negative is stronger evidence against a unit root
    pub statistic: f64,
    /// Threshold the statistic was compared against
    pub critical_value: f64,
    /// Number of lagged differences in the test regression
    pub lags: usize,
    /// Observations used in the test regression
    pub observations: usize,
}

/// A unit-root testing capability.
///
/// `lag` is the number of lagged-difference terms to include; larger lags
/// absorb more autocorrelation at the cost of degrees of freedom.
#[cfg_attr(test, mockall::automock)]
pub trait StationarityOracle: Send + Sync {
    fn test(&self, series: &[f64], lag: usize) -> StatsResult<StationarityVerdict>;
}

/// Significance level for the unit-root decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    OnePercent,
    #[default]
    FivePercent,
    TenPercent,
}

impl Significance {
    /// MacKinnon (2010) response-surface coefficients, constant-only model, one series
    fn response_surface(self) -> [f64; 4] {
        match self {
            Significance::OnePercent => [-3.43035, -6.5393, -16.786, -79.433],
            Significance::FivePercent => [-2.86154, -2.8903, -4.234, -40.040],
            Significance::TenPercent => [-2.56677, -1.5384, -2.809, 0.0],
        }
    }

    /// Finite-sample critical value for `observations` regression rows.
    pub fn critical_value(self, observations: usize) -> f64 {
        let [b0, b1, b2, b3] = self.response_surface();
        let t = observations as f64;
        b0 + b1 / t + b2 / (t * t) + b3 / (t * t * t)
    }
}

impl std::str::FromStr for Significance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('%') {
            "1" | "0.01" => Ok(Self::OnePercent),
            "5" | "0.05" => Ok(Self::FivePercent),
            "10" | "0.1" | "0.10" => Ok(Self::TenPercent),
            _ => Err(format!(
                "Unsupported significance level: '{}'. Use 1%, 5% or 10%",
                s
            )),
        }
    }
}

/// Augmented Dickey-Fuller test with a constant term.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdfTest {
    significance: Significance,
}

impl AdfTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_significance(mut self, significance: Significance) -> Self {
        self.significance = significance;
        self
    }

    pub fn significance(&self) -> Significance {
        self.significance
    }

    /// Shortest series the test regression can be fitted on for a given lag.
    ///
    /// The regression has `lag + 2` coefficients and needs at least one spare
    /// degree of freedom for the standard error.
    pub fn min_length(lag: usize) -> usize {
        2 * lag + 4
    }
}

impl StationarityOracle for AdfTest {
    fn test(&self, series: &[f64], lag: usize) -> StatsResult<StationarityVerdict> {
        if series.is_empty() {
            return Err(StatsError::EmptySeries);
        }
        ensure_min_len(series.len(), Self::min_length(lag))?;

        // Δy[i] = y[i+1] - y[i]
        let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
        let rows = diffs.len() - lag;
        let cols = lag + 2;

        // Row r is time t = r + lag: [1, y[t], Δy[t-1], ..., Δy[t-lag]]
        let design = DMatrix::from_fn(rows, cols, |r, c| {
            let t = r + lag;
            match c {
                0 => 1.0,
                1 => series[t],
                j => diffs[t - (j - 1)],
            }
        });
        let response = DMatrix::from_fn(rows, 1, |r, _| diffs[r + lag]);

        let fit = least_squares(&design, &response)?;
        let gamma = fit.coefficients[(1, 0)];
        let se_gamma = fit.std_errors(0)?[1];

        if !se_gamma.is_finite() || se_gamma <= f64::EPSILON * gamma.abs().max(1.0) {
            return Err(StatsError::NumericalFailure(
                "unit-root regression has zero residual variance".to_string(),
            ));
        }

        let statistic = gamma / se_gamma;
        let critical_value = self.significance.critical_value(rows);
        let is_stationary = statistic < critical_value;

        trace!(
            statistic,
            critical_value,
            lag,
            observations = rows,
            "ADF test complete"
        );

        Ok(StationarityVerdict {
            is_stationary,
            statistic,
            critical_value,
            lags: lag,
            observations: rows,
        })
    }
}
