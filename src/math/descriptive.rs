//! Descriptive statistics and rolling bands.
//!
//! Variance is the population variance (divisor `n`) everywhere in the crate,
//! including the window standard deviation used by the Hurst estimator.

use crate::error::{ensure_min_len, ensure_same_len, StatsError, StatsResult};
use serde::Serialize;

/// Band width in standard deviations when none is given
pub const DEFAULT_BAND_WIDTH: f64 = 2.0;

/// Mean and population variance of a non-empty slice.
///
/// The mean is accumulated relative to the first observation, which keeps a
/// constant series exactly constant; the variance is a second pass over the
/// centred values.
pub(crate) fn moments(values: &[f64]) -> (f64, f64) {
    debug_assert!(!values.is_empty());
    let n = values.len() as f64;
    let shift = values[0];

    let mean = shift + values.iter().map(|v| v - shift).sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

/// Arithmetic mean of the series.
pub fn mean(series: &[f64]) -> StatsResult<f64> {
    if series.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    Ok(moments(series).0)
}

/// Population variance; a single observation has variance 0.
pub fn variance(series: &[f64]) -> StatsResult<f64> {
    if series.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    Ok(moments(series).1)
}

/// Population standard deviation.
pub fn std_dev(series: &[f64]) -> StatsResult<f64> {
    variance(series).map(f64::sqrt)
}

/// Calculate Pearson correlation coefficient between two price series
///
/// Returns a value in [-1.0, 1.0]. A series with zero variance has no linear
/// relationship with anything and yields 0.0.
///
/// # Mathematical Definition
/// r = Σ[(xi - x̄)(yi - ȳ)] / √[Σ(xi - x̄)² × Σ(yi - ȳ)²]
pub fn correlation(a: &[f64], b: &[f64]) -> StatsResult<f64> {
    ensure_same_len(a, b)?;
    ensure_min_len(a.len(), 2)?;

    let (mean_a, _) = moments(a);
    let (mean_b, _) = moments(b);

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return Ok(0.0);
    }

    let r = covariance / (var_a.sqrt() * var_b.sqrt());
    if r.is_finite() {
        Ok(r.clamp(-1.0, 1.0))
    } else {
        Err(StatsError::NumericalFailure(
            "correlation is not finite".to_string(),
        ))
    }
}

/// Rolling Bollinger bands aligned with the input series.
///
/// Entry `i` is computed from the trailing window `series[i - window..i]`, so it
/// never includes the value at `i` itself. The first `window` entries are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub window: usize,
    pub num_std: f64,
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerBands {
    /// Number of entries (equals the input length).
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// Most recent `(lower, middle, upper)` triple, if any band has been formed.
    pub fn latest(&self) -> Option<(f64, f64, f64)> {
        let i = self.len().checked_sub(1)?;
        Some((self.lower[i]?, self.middle[i]?, self.upper[i]?))
    }
}

/// Bollinger bands at ±2 standard deviations.
pub fn bollinger_bands(series: &[f64], window: usize) -> StatsResult<BollingerBands> {
    bollinger_bands_with_width(series, window, DEFAULT_BAND_WIDTH)
}

/// Bollinger bands at ±`num_std` standard deviations.
///
/// # Errors
/// - `InvalidParameter` if `window` is 0 or `num_std` is negative/non-finite
/// - `InsufficientData` if the series is shorter than `window`
pub fn bollinger_bands_with_width(
    series: &[f64],
    window: usize,
    num_std: f64,
) -> StatsResult<BollingerBands> {
    if window == 0 {
        return Err(StatsError::InvalidParameter(
            "bollinger window must be at least 1".to_string(),
        ));
    }
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(StatsError::InvalidParameter(format!(
            "band width must be a non-negative number, got {}",
            num_std
        )));
    }
    ensure_min_len(series.len(), window)?;

    let n = series.len();
    let mut middle = vec![None; n];
    let mut upper = vec![None; n];
    let mut lower = vec![None; n];

    for i in window..n {
        let (m, var) = moments(&series[i - window..i]);
        let width = num_std * var.sqrt();
        middle[i] = Some(m);
        upper[i] = Some(m + width);
        lower[i] = Some(m - width);
    }

    Ok(BollingerBands {
        window,
        num_std,
        middle,
        upper,
        lower,
    })
}
