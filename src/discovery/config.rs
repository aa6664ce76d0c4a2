//! Configuration for universe pair screening

use super::error::ConfigError;
use crate::analysis::stationarity::Significance;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds applied by [`super::screen_pairs`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Minimum Pearson correlation threshold (-1.0 to 1.0)
    #[serde(default = "default_min_correlation")]
    pub min_correlation: f64,

    /// Maximum half-life of the spread, in sampling periods
    #[serde(default = "default_max_half_life")]
    pub max_half_life: f64,

    /// Maximum Hurst exponent of the spread
    #[serde(default = "default_max_hurst")]
    pub max_hurst: f64,

    /// Lagged differences in the ADF regression
    #[serde(default = "default_adf_lag")]
    pub adf_lag: usize,

    /// ADF significance level
    #[serde(default)]
    pub significance: Significance,

    /// Drop pairs whose spread fails the stationarity test
    #[serde(default = "default_require_cointegration")]
    pub require_cointegration: bool,

    /// Maximum number of pairs to output
    #[serde(default = "default_max_pairs")]
    pub max_pairs: usize,
}

// Default value functions for serde
fn default_min_correlation() -> f64 {
    0.8
}
fn default_max_half_life() -> f64 {
    48.0
}
fn default_max_hurst() -> f64 {
    0.5
}
fn default_adf_lag() -> usize {
    1
}
fn default_require_cointegration() -> bool {
    true
}
fn default_max_pairs() -> usize {
    10
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            min_correlation: default_min_correlation(),
            max_half_life: default_max_half_life(),
            max_hurst: default_max_hurst(),
            adf_lag: default_adf_lag(),
            significance: Significance::default(),
            require_cointegration: default_require_cointegration(),
            max_pairs: default_max_pairs(),
        }
    }
}

impl ScreeningConfig {
    /// Load and validate a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-1.0..=1.0).contains(&self.min_correlation) {
            return Err(ConfigError::Invalid(format!(
                "min_correlation must be between -1.0 and 1.0, got {}",
                self.min_correlation
            )));
        }
        if self.max_half_life.is_nan() || self.max_half_life <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_half_life must be positive, got {}",
                self.max_half_life
            )));
        }
        if !self.max_hurst.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "max_hurst must be finite, got {}",
                self.max_hurst
            )));
        }
        if self.max_pairs == 0 {
            return Err(ConfigError::Invalid("max_pairs must be at least 1".to_string()));
        }
        Ok(())
    }
}
