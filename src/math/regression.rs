//! Ordinary least squares.
//!
//! Simple regression uses the closed-form centred estimator. Everything with
//! more than one regressor goes through a Householder QR factorisation, which
//! avoids forming `XᵀX` and lets rank deficiency be read off the diagonal of `R`.

use crate::error::{ensure_min_len, ensure_same_len, StatsError, StatsResult};
use crate::math::descriptive::moments;
use nalgebra::DMatrix;
use serde::Serialize;
use tracing::trace;

/// Diagonal entries of `R` below this fraction of the largest one are treated as zero
const RANK_TOLERANCE: f64 = 1e-10;

/// Best-fit line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionResult {
    pub intercept: f64,
    pub slope: f64,
}

impl RegressionResult {
    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Residuals `y[i] - ŷ[i]`.
    pub fn residuals(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(y.iter())
            .map(|(xi, yi)| yi - self.predict(*xi))
            .collect()
    }
}

/// Regress `y` on `x`.
///
/// # Errors
/// - `LengthMismatch` if the series differ in length
/// - `InsufficientData` with fewer than two observations
/// - `RankDeficient` if `x` is constant
pub fn simple_linear_regression(x: &[f64], y: &[f64]) -> StatsResult<RegressionResult> {
    ensure_same_len(x, y)?;
    ensure_min_len(x.len(), 2)?;

    let (mean_x, _) = moments(x);
    let (mean_y, _) = moments(y);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        sxy += dx * (yi - mean_y);
        sxx += dx * dx;
    }

    if sxx == 0.0 {
        return Err(StatsError::RankDeficient);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(StatsError::NumericalFailure(
            "regression coefficients are not finite".to_string(),
        ));
    }

    Ok(RegressionResult { intercept, slope })
}

/// Hyperplane `y = intercept + Σ coefficients[j] * x_j`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleRegressionResult {
    pub intercept: f64,
    /// One coefficient per predictor, in predictor order
    pub coefficients: Vec<f64>,
}

impl MultipleRegressionResult {
    /// Fitted value for one observation of the predictors.
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }
}

/// Regress `y` on any number of predictor series (an intercept is always fitted).
///
/// # Errors
/// - `InvalidParameter` with no predictors
/// - `LengthMismatch` if a predictor's length differs from `y`
/// - `InsufficientData` with fewer observations than coefficients
/// - `RankDeficient` if predictors are constant, duplicated or linearly dependent
pub fn multiple_linear_regression(
    y: &[f64],
    predictors: &[&[f64]],
) -> StatsResult<MultipleRegressionResult> {
    if predictors.is_empty() {
        return Err(StatsError::InvalidParameter(
            "at least one predictor series is required".to_string(),
        ));
    }
    for x in predictors {
        ensure_same_len(x, y)?;
    }

    let rows = y.len();
    let cols = predictors.len() + 1;
    let design = DMatrix::from_fn(rows, cols, |i, j| {
        if j == 0 {
            1.0
        } else {
            predictors[j - 1][i]
        }
    });
    let response = DMatrix::from_column_slice(rows, 1, y);

    let fit = least_squares(&design, &response)?;
    let beta = fit.coefficients.column(0);

    Ok(MultipleRegressionResult {
        intercept: beta[0],
        coefficients: beta.iter().skip(1).copied().collect(),
    })
}

/// Output of a QR least-squares solve `X B ≈ Y`.
#[derive(Debug, Clone)]
pub(crate) struct LeastSquaresFit {
    /// `cols(X) × cols(Y)`
    pub coefficients: DMatrix<f64>,
    /// `Y - X B`
    pub residuals: DMatrix<f64>,
    /// `R⁻¹`, so that `(XᵀX)⁻¹ = R⁻¹ R⁻ᵀ`
    r_inverse: DMatrix<f64>,
}

impl LeastSquaresFit {
    /// Classical OLS standard errors of the coefficients for response column `col`.
    pub fn std_errors(&self, col: usize) -> StatsResult<Vec<f64>> {
        let n = self.residuals.nrows();
        let k = self.coefficients.nrows();
        if n <= k {
            return Err(StatsError::InsufficientData {
                required: k + 1,
                actual: n,
            });
        }

        let sse: f64 = self.residuals.column(col).iter().map(|e| e * e).sum();
        let sigma2 = sse / (n - k) as f64;

        Ok((0..k)
            .map(|j| {
                let row = self.r_inverse.row(j);
                (sigma2 * row.dot(&row)).sqrt()
            })
            .collect())
    }
}

/// Least-squares solve by Householder QR.
///
/// Every column of `response` is fitted against the same design matrix.
pub(crate) fn least_squares(
    design: &DMatrix<f64>,
    response: &DMatrix<f64>,
) -> StatsResult<LeastSquaresFit> {
    let (rows, cols) = design.shape();
    if response.nrows() != rows {
        return Err(StatsError::LengthMismatch {
            left: rows,
            right: response.nrows(),
        });
    }
    if cols == 0 {
        return Err(StatsError::InvalidParameter(
            "design matrix has no columns".to_string(),
        ));
    }
    ensure_min_len(rows, cols)?;
    if design.iter().chain(response.iter()).any(|v| !v.is_finite()) {
        return Err(StatsError::NumericalFailure(
            "regression input contains non-finite values".to_string(),
        ));
    }

    if design
        .column_iter()
        .chain(response.column_iter())
        .any(|column| !column.norm_squared().is_finite())
    {
        return Err(StatsError::NumericalFailure(
            "regression input magnitude overflows".to_string(),
        ));
    }

    let qr = design.clone().qr();
    let q = qr.q();
    let r = qr.r();

    if r.diagonal().iter().any(|d| !d.is_finite()) {
        return Err(StatsError::NumericalFailure(
            "QR factor is not finite (input magnitude overflow)".to_string(),
        ));
    }
    let max_diag = r.diagonal().iter().fold(0.0f64, |m, d| m.max(d.abs()));
    let rank = r
        .diagonal()
        .iter()
        .filter(|d| d.abs() > RANK_TOLERANCE * max_diag)
        .count();
    if max_diag == 0.0 || rank < cols {
        trace!(rank, cols, "QR detected rank deficiency");
        return Err(StatsError::RankDeficient);
    }

    let coefficients = r
        .solve_upper_triangular(&(q.transpose() * response))
        .ok_or_else(|| StatsError::NumericalFailure("triangular solve failed".to_string()))?;
    let r_inverse = r
        .solve_upper_triangular(&DMatrix::identity(cols, cols))
        .ok_or_else(|| StatsError::NumericalFailure("R is not invertible".to_string()))?;

    let residuals = response - design * &coefficients;

    Ok(LeastSquaresFit {
        coefficients,
        residuals,
        r_inverse,
    })
}
