//! Hurst exponent via rescaled-range (R/S) analysis.
//!
//! For every window size `n` in `2..=len/2` the series is cut into
//! non-overlapping windows of length `n` (a trailing remainder is discarded).
//! Each window contributes `R/S`: the range of its mean-centred cumulative sum
//! divided by its population standard deviation. Windows with zero standard
//! deviation are left out of the average. The exponent is the OLS slope of
//! `ln(mean R/S)` against `ln(n)`.
//!
//! Interpretation:
//! - H < 0.5: mean-reverting / anti-persistent
//! - H ≈ 0.5: random walk
//! - H > 0.5: trending / persistent
//!
//! The slope is not bounded by construction; values outside (0, 1) should be
//! treated as low confidence.

use crate::error::{ensure_min_len, StatsError, StatsResult};
use crate::math::descriptive::moments;
use crate::math::regression::simple_linear_regression;
use serde::Serialize;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HurstResult {
    pub exponent: f64,
    /// Number of window sizes that entered the log-log fit
    pub scales: usize,
}

impl HurstResult {
    /// True when the exponent lies in the interpretable (0, 1) range.
    pub fn is_well_behaved(&self) -> bool {
        self.exponent > 0.0 && self.exponent < 1.0
    }

    pub fn is_mean_reverting(&self) -> bool {
        self.exponent < 0.5
    }
}

/// Rescaled range of one window, or `None` when the window is flat.
///
/// Fails with `NumericalFailure` when the window variance overflows.
fn rescaled_range(window: &[f64]) -> StatsResult<Option<f64>> {
    let (mean, variance) = moments(window);
    if !variance.is_finite() {
        return Err(StatsError::NumericalFailure(format!(
            "window variance overflowed (window of {})",
            window.len()
        )));
    }
    let std_dev = variance.sqrt();
    if std_dev <= 0.0 {
        return Ok(None);
    }

    let mut cumulative = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in window {
        cumulative += v - mean;
        min = min.min(cumulative);
        max = max.max(cumulative);
    }

    Ok(Some((max - min) / std_dev))
}

/// Estimate the Hurst exponent of a series.
///
/// # Errors
/// - `InsufficientData` for fewer than 2 observations, or when fewer than two
///   window sizes yield a usable R/S average (very short or constant series)
/// - `NumericalFailure` if the log-log fit produces a non-finite slope
pub fn hurst_exponent(series: &[f64]) -> StatsResult<HurstResult> {
    ensure_min_len(series.len(), 2)?;

    let max_window = series.len() / 2;
    let mut log_n = Vec::with_capacity(max_window.saturating_sub(1));
    let mut log_rs = Vec::with_capacity(max_window.saturating_sub(1));

    for n in 2..=max_window {
        let mut sum = 0.0;
        let mut count = 0usize;
        for window in series.chunks_exact(n) {
            if let Some(rs) = rescaled_range(window)? {
                sum += rs;
                count += 1;
            }
        }

        if count == 0 {
            trace!(window = n, "All windows flat, skipping scale");
            continue;
        }

        let mean_rs = sum / count as f64;
        if mean_rs <= 0.0 {
            // Cumulative range of a non-flat window is always positive
            continue;
        }
        log_n.push((n as f64).ln());
        log_rs.push(mean_rs.ln());
    }

    if log_n.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: log_n.len(),
        });
    }

    let fit = simple_linear_regression(&log_n, &log_rs)?;
    if !fit.slope.is_finite() {
        return Err(StatsError::NumericalFailure(
            "Hurst log-log slope is not finite".to_string(),
        ));
    }

    Ok(HurstResult {
        exponent: fit.slope,
        scales: log_n.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_rejected() {
        assert!(matches!(
            hurst_exponent(&[]),
            Err(StatsError::InsufficientData { .. })
        ));
        assert!(matches!(
            hurst_exponent(&[1.0]),
            Err(StatsError::InsufficientData { .. })
        ));
        // Only one window size (n = 2) is available for four points
        assert!(matches!(
            hurst_exponent(&[1.0, 2.0, 3.0, 4.0]),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_constant_series_has_no_usable_scale() {
        assert_eq!(
            hurst_exponent(&[5.0; 40]),
            Err(StatsError::InsufficientData {
                required: 2,
                actual: 0
            })
        );
    }

    #[test]
    fn test_linear_series_is_trending() {
        let series: Vec<f64> = (1..=200).map(|i| i as f64).collect();
        let result = hurst_exponent(&series).unwrap();
        assert!(
            result.exponent > 0.7,
            "linear series should look persistent, got {}",
            result.exponent
        );
        assert_eq!(result.scales, 99);
    }

    #[test]
    fn test_alternating_series_is_anti_persistent() {
        let series: Vec<f64> = (0..200).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let result = hurst_exponent(&series).unwrap();
        assert!(result.is_mean_reverting(), "got {}", result.exponent);
    }

    #[test]
    fn test_rescaled_range_of_pair() {
        // Deviations [-0.5, 0.5], cumulative [-0.5, 0.0], range 0.5, sd 0.5
        assert_eq!(rescaled_range(&[1.0, 2.0]).unwrap(), Some(1.0));
        assert_eq!(rescaled_range(&[3.0, 3.0]).unwrap(), None);
    }

    #[test]
    fn test_overflowing_values_are_numerical_failure() {
        let series: Vec<f64> = (0..40)
            .map(|i| {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                sign * 1e160 * (1.0 + i as f64 * 0.01)
            })
            .collect();
        assert!(matches!(
            hurst_exponent(&series),
            Err(StatsError::NumericalFailure(_))
        ));
    }

    #[test]
    fn test_flat_windows_are_excluded() {
        // First half flat, second half varying: flat windows must not drag the mean to zero
        let mut series = vec![1.0; 32];
        series.extend((0..32).map(|i| (i as f64 * 0.7).sin()));
        let result = hurst_exponent(&series).unwrap();
        assert!(result.exponent.is_finite());
    }
}
