//! Johansen trace test for cointegration among `k ≥ 2` series.
//!
//! With `p = lag`, `Δy[t] = y[t+1] - y[t]` and `T = rows - 1 - p` usable rows:
//!
//! 1. Build the differenced matrix `Z0[t] = Δy[t]`, the level matrix shifted
//!    by the lag `Z1[t] = y[t + 1 - p]`, and short-run regressors
//!    `Zk[t] = [1, Δy[t-1], ..., Δy[t-p]]`
//! 2. Regress `Z0` and `Z1` on `Zk` by QR least squares, giving residual
//!    matrices `R0`, `R1`
//! 3. Residual covariances `Sij = RiᵀRj / (T - 1)`
//! 4. Symmetric eigen-decomposition of
//!    `S11^-1/2 S10 S00^-1 S01 S11^-1/2`; its eigenvalues λ lie in [0, 1)
//! 5. Trace statistic `-T Σ ln(1 - λ)` over the positive eigenvalues
//!
//! The decision uses one fixed 95% critical value (15.41, the tabulated value
//! for two series with a constant) regardless of `k`. For `k > 2` this is
//! lenient; pass a table value through [`JohansenTest::with_critical_value`]
//! when testing larger systems.

use crate::error::{StatsError, StatsResult};
use crate::math::regression::least_squares;
use nalgebra::{DMatrix, SymmetricEigen};
use serde::Serialize;
use tracing::{debug, trace};

/// 95% trace critical value for r = 0, two series, constant term
pub const DEFAULT_CRITICAL_VALUE: f64 = 15.41;

/// Eigenvalues this close to zero are treated as zero
const EIGEN_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JohansenResult {
    pub is_cointegrated: bool,
    /// Trace statistic for the null of no cointegration (r = 0)
    pub trace_statistic: f64,
    pub critical_value: f64,
    /// Eigenvalues in descending order
    pub eigenvalues: Vec<f64>,
    /// Trace statistic for each null `r = 0..k-1`
    pub trace_statistics: Vec<f64>,
    /// Rows used after differencing and lagging
    pub observations: usize,
}

/// Configured Johansen test.
#[derive(Debug, Clone, Copy)]
pub struct JohansenTest {
    critical_value: f64,
}

impl Default for JohansenTest {
    fn default() -> Self {
        Self {
            critical_value: DEFAULT_CRITICAL_VALUE,
        }
    }
}

/// Johansen test with the default critical value.
pub fn johansen_test(series: &[&[f64]], lag: usize) -> StatsResult<JohansenResult> {
    JohansenTest::new().run(series, lag)
}

impl JohansenTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_critical_value(mut self, critical_value: f64) -> Self {
        self.critical_value = critical_value;
        self
    }

    pub fn critical_value(&self) -> f64 {
        self.critical_value
    }

    /// Minimum number of rows for `k` series at a given lag.
    pub fn min_rows(k: usize, lag: usize) -> usize {
        // T must exceed the (1 + k*lag) short-run regressors by at least k
        2 + lag + k * lag + k
    }

    /// Run the test on `series` (one slice per series, all the same length).
    ///
    /// # Errors
    /// - `EmptySeries` if no series or an empty series is supplied
    /// - `InvalidParameter` for fewer than 2 series or `lag` outside `[1, rows)`
    /// - `LengthMismatch` if the series differ in length
    /// - `InsufficientData` if too few rows remain after lagging
    /// - `NumericalFailure` if a solve or decomposition cannot complete
    pub fn run(&self, series: &[&[f64]], lag: usize) -> StatsResult<JohansenResult> {
        if series.is_empty() || series.iter().any(|s| s.is_empty()) {
            return Err(StatsError::EmptySeries);
        }
        let k = series.len();
        if k < 2 {
            return Err(StatsError::InvalidParameter(format!(
                "johansen test needs at least 2 series, got {}",
                k
            )));
        }
        let rows = series[0].len();
        if let Some(other) = series.iter().find(|s| s.len() != rows) {
            return Err(StatsError::LengthMismatch {
                left: rows,
                right: other.len(),
            });
        }
        if lag < 1 || lag >= rows {
            return Err(StatsError::InvalidParameter(format!(
                "lag must be in [1, {}), got {}",
                rows, lag
            )));
        }
        let required = Self::min_rows(k, lag);
        if rows < required {
            return Err(StatsError::InsufficientData {
                required,
                actual: rows,
            });
        }

        let diff = |t: usize, c: usize| series[c][t + 1] - series[c][t];
        let t_obs = rows - 1 - lag;

        // Short-run regressors: intercept plus `lag` lagged differences of every series
        let short_run = DMatrix::from_fn(t_obs, 1 + k * lag, |r, c| {
            if c == 0 {
                return 1.0;
            }
            let t = r + lag;
            let j = (c - 1) / k + 1;
            diff(t - j, (c - 1) % k)
        });

        // [Z0 | Z1]: differences, then levels shifted by the lag
        let targets = DMatrix::from_fn(t_obs, 2 * k, |r, c| {
            let t = r + lag;
            if c < k {
                diff(t, c)
            } else {
                series[c - k][t + 1 - lag]
            }
        });

        let fit = least_squares(&short_run, &targets).map_err(|e| {
            StatsError::NumericalFailure(format!("auxiliary regression failed: {}", e))
        })?;
        let r0 = fit.residuals.columns(0, k).into_owned();
        let r1 = fit.residuals.columns(k, k).into_owned();

        let scale = (t_obs - 1) as f64;
        let s00 = r0.transpose() * &r0 / scale;
        let s11 = r1.transpose() * &r1 / scale;
        let s01 = r0.transpose() * &r1 / scale;

        let s00_inv = s00
            .cholesky()
            .ok_or_else(|| {
                StatsError::NumericalFailure("residual covariance S00 is singular".to_string())
            })?
            .inverse();
        let s11_inv_sqrt = inverse_sqrt(s11)?;

        let m = &s11_inv_sqrt * s01.transpose() * s00_inv * &s01 * &s11_inv_sqrt;
        let m = (&m + m.transpose()) * 0.5;

        let mut eigenvalues: Vec<f64> = SymmetricEigen::new(m)
            .eigenvalues
            .iter()
            .map(|l| if l.abs() < EIGEN_TOLERANCE { 0.0 } else { *l })
            .collect();
        if eigenvalues.iter().any(|l| !l.is_finite() || *l >= 1.0) {
            return Err(StatsError::NumericalFailure(format!(
                "eigenvalues outside [0, 1): {:?}",
                eigenvalues
            )));
        }
        eigenvalues.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let n = t_obs as f64;
        let trace_statistics: Vec<f64> = (0..k)
            .map(|r| {
                -n * eigenvalues[r..]
                    .iter()
                    .filter(|l| **l > 0.0)
                    .map(|l| (1.0 - l).ln())
                    .sum::<f64>()
            })
            .collect();
        let trace_statistic = trace_statistics[0];
        let is_cointegrated = trace_statistic > self.critical_value;

        debug!(
            series = k,
            lag,
            observations = t_obs,
            trace = trace_statistic,
            critical = self.critical_value,
            cointegrated = is_cointegrated,
            "Johansen test complete"
        );

        Ok(JohansenResult {
            is_cointegrated,
            trace_statistic,
            critical_value: self.critical_value,
            eigenvalues,
            trace_statistics,
            observations: t_obs,
        })
    }
}

/// `A^-1/2` for a symmetric positive-definite matrix.
fn inverse_sqrt(a: DMatrix<f64>) -> StatsResult<DMatrix<f64>> {
    let eigen = SymmetricEigen::new(a);
    let max = eigen.eigenvalues.iter().fold(0.0f64, |m, l| m.max(*l));
    if max <= 0.0 || eigen.eigenvalues.iter().any(|l| *l <= max * EIGEN_TOLERANCE) {
        trace!(eigenvalues = ?eigen.eigenvalues.as_slice(), "S11 not positive definite");
        return Err(StatsError::NumericalFailure(
            "residual covariance S11 is singular".to_string(),
        ));
    }
    let scaled = DMatrix::from_diagonal(&eigen.eigenvalues.map(|l| 1.0 / l.sqrt()));
    Ok(&eigen.eigenvectors * scaled * eigen.eigenvectors.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn random_walk(rng: &mut StdRng, n: usize) -> Vec<f64> {
        let step = Normal::new(0.0, 1.0).unwrap();
        let mut level = 100.0;
        (0..n)
            .map(|_| {
                level += step.sample(rng);
                level
            })
            .collect()
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(johansen_test(&[], 1), Err(StatsError::EmptySeries));

        let a: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let empty: Vec<f64> = vec![];
        assert_eq!(
            johansen_test(&[a.as_slice(), empty.as_slice()], 1),
            Err(StatsError::EmptySeries)
        );
        assert!(matches!(
            johansen_test(&[a.as_slice()], 1),
            Err(StatsError::InvalidParameter(_))
        ));
        assert!(matches!(
            johansen_test(&[a.as_slice(), &a[..40]], 1),
            Err(StatsError::LengthMismatch { .. })
        ));
        assert!(matches!(
            johansen_test(&[a.as_slice(), a.as_slice()], 0),
            Err(StatsError::InvalidParameter(_))
        ));
        assert!(matches!(
            johansen_test(&[a.as_slice(), a.as_slice()], 50),
            Err(StatsError::InvalidParameter(_))
        ));
        assert!(matches!(
            johansen_test(&[&a[..6], &a[..6]], 1),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_duplicate_series_is_numerical_failure() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = random_walk(&mut rng, 200);
        assert!(matches!(
            johansen_test(&[a.as_slice(), a.as_slice()], 1),
            Err(StatsError::NumericalFailure(_))
        ));
    }

    #[test]
    fn test_cointegrated_pair_detected() {
        let mut rng = StdRng::seed_from_u64(11);
        let noise = Normal::new(0.0, 0.5).unwrap();
        let x = random_walk(&mut rng, 400);
        let y: Vec<f64> = x.iter().map(|v| v + noise.sample(&mut rng)).collect();

        let result = johansen_test(&[x.as_slice(), y.as_slice()], 1).unwrap();
        assert!(result.is_cointegrated, "trace = {}", result.trace_statistic);
        assert_eq!(result.eigenvalues.len(), 2);
        assert!(result.eigenvalues[0] >= result.eigenvalues[1]);
        assert!(result.trace_statistics[0] >= result.trace_statistics[1]);
        assert_eq!(result.observations, 398);
    }

    #[test]
    fn test_eigenvalues_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let x = random_walk(&mut rng, 300);
        let y = random_walk(&mut rng, 300);
        let z = random_walk(&mut rng, 300);
        let result = johansen_test(&[x.as_slice(), y.as_slice(), z.as_slice()], 2).unwrap();
        assert_eq!(result.eigenvalues.len(), 3);
        assert!(result.eigenvalues.iter().all(|l| (0.0..1.0).contains(l)));
        assert!(result.trace_statistic >= 0.0);
    }

    #[test]
    fn test_trace_is_scale_invariant_and_uses_sample_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let x = random_walk(&mut rng, 250);
        let y = random_walk(&mut rng, 250);
        let scaled: Vec<f64> = y.iter().map(|v| v * 1000.0).collect();

        let base = johansen_test(&[x.as_slice(), y.as_slice()], 1).unwrap();
        let rescaled = johansen_test(&[x.as_slice(), scaled.as_slice()], 1).unwrap();
        approx::assert_relative_eq!(
            base.trace_statistic,
            rescaled.trace_statistic,
            max_relative = 1e-6
        );

        let expected: f64 = -(base.observations as f64)
            * base
                .eigenvalues
                .iter()
                .filter(|l| **l > 0.0)
                .map(|l| (1.0 - l).ln())
                .sum::<f64>();
        approx::assert_relative_eq!(base.trace_statistic, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_custom_critical_value() {
        let mut rng = StdRng::seed_from_u64(21);
        let x = random_walk(&mut rng, 200);
        let y = random_walk(&mut rng, 200);
        let result = JohansenTest::new()
            .with_critical_value(f64::INFINITY)
            .run(&[x.as_slice(), y.as_slice()], 1)
            .unwrap();
        assert!(!result.is_cointegrated);
        assert_eq!(result.critical_value, f64::INFINITY);
    }
}
