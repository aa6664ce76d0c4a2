//! Error types for the statistics engine

use thiserror::Error;

/// Errors returned by the estimators.
///
/// Every failure is a deterministic function of the input, so callers should
/// skip the offending series and carry on rather than retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Series shorter than the algorithm needs
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Fitted decay coefficient does not describe a reverting process
    #[error("Series is not mean-reverting (lag slope {slope:.6} >= 0)")]
    NotMeanReverting { slope: f64 },

    /// Regression design matrix is not full rank
    #[error("Design matrix is rank deficient")]
    RankDeficient,

    /// No observations supplied
    #[error("Series is empty")]
    EmptySeries,

    /// Linear-algebra solve or decomposition could not complete
    #[error("Numerical failure: {0}")]
    NumericalFailure(String),

    /// Paired inputs differ in length
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Caller-supplied parameter outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Convenience alias used throughout the engine.
pub type StatsResult<T> = Result<T, StatsError>;

/// Fails with [`StatsError::LengthMismatch`] unless both slices have the same length.
pub(crate) fn ensure_same_len(left: &[f64], right: &[f64]) -> StatsResult<()> {
    if left.len() != right.len() {
        return Err(StatsError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

/// Fails with [`StatsError::InsufficientData`] when `len < required`.
pub(crate) fn ensure_min_len(len: usize, required: usize) -> StatsResult<()> {
    if len < required {
        return Err(StatsError::InsufficientData {
            required,
            actual: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = StatsError::InsufficientData {
            required: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Insufficient data: need at least 2, got 1");
    }

    #[test]
    fn test_length_guard() {
        assert!(ensure_same_len(&[1.0, 2.0], &[3.0, 4.0]).is_ok());
        assert_eq!(
            ensure_same_len(&[1.0], &[3.0, 4.0]),
            Err(StatsError::LengthMismatch { left: 1, right: 2 })
        );
    }
}
