//! Mathematical utilities for the statistics engine.
//!
//! Descriptive statistics, rolling bands and the least-squares kernel that
//! the estimators in [`crate::analysis`] are built on.

pub mod descriptive;
pub mod regression;

pub use descriptive::{
    bollinger_bands, bollinger_bands_with_width, correlation, mean, std_dev, variance,
    BollingerBands,
};
pub use regression::{
    multiple_linear_regression, simple_linear_regression, MultipleRegressionResult,
    RegressionResult,
};
