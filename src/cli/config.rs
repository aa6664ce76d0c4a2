//! CLI configuration structs bridging CLI arguments to domain types.
//!
//! Command handlers take these validated configs instead of raw arguments.

use crate::analysis::Significance;
use crate::types::PriceField;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when validating CLI arguments.
#[derive(Debug, Error, PartialEq)]
pub enum CliConfigError {
    #[error("At least {required} bar files are required, got {actual}")]
    TooFewInputs { required: usize, actual: usize },

    #[error("Bollinger window must be at least 1")]
    InvalidWindow,

    #[error("Band width must be a non-negative number, got {0}")]
    InvalidBandWidth(f64),

    #[error("Lag must be at least 1")]
    InvalidLag,
}

/// Configuration for the `analyze` command.
#[derive(Debug, Clone)]
pub struct AnalyzeCliConfig {
    pub bars: Vec<PathBuf>,
    pub field: PriceField,
    /// Bollinger window
    pub window: usize,
    /// Bollinger width in standard deviations
    pub num_std: f64,
    /// ADF lag
    pub lag: usize,
    pub significance: Significance,
}

impl AnalyzeCliConfig {
    pub fn validate(&self) -> Result<(), CliConfigError> {
        ensure_inputs(self.bars.len(), 1)?;
        if self.window == 0 {
            return Err(CliConfigError::InvalidWindow);
        }
        if !self.num_std.is_finite() || self.num_std < 0.0 {
            return Err(CliConfigError::InvalidBandWidth(self.num_std));
        }
        Ok(())
    }
}

/// Configuration for the `cointegrate` command.
#[derive(Debug, Clone)]
pub struct CointegrateCliConfig {
    pub left: PathBuf,
    pub right: PathBuf,
    pub field: PriceField,
    pub lag: usize,
    pub significance: Significance,
}

/// Configuration for the `johansen` command.
#[derive(Debug, Clone)]
pub struct JohansenCliConfig {
    pub bars: Vec<PathBuf>,
    pub field: PriceField,
    pub lag: usize,
    pub critical_value: f64,
}

impl JohansenCliConfig {
    pub fn validate(&self) -> Result<(), CliConfigError> {
        ensure_inputs(self.bars.len(), 2)?;
        if self.lag == 0 {
            return Err(CliConfigError::InvalidLag);
        }
        Ok(())
    }
}

/// Configuration for the `screen` command.
#[derive(Debug, Clone)]
pub struct ScreenCliConfig {
    pub bars: Vec<PathBuf>,
    pub field: PriceField,
    /// Optional JSON screening config
    pub config: Option<PathBuf>,
    /// Where to write the screened pairs
    pub output: Option<PathBuf>,
}

impl ScreenCliConfig {
    pub fn validate(&self) -> Result<(), CliConfigError> {
        ensure_inputs(self.bars.len(), 2)
    }
}

fn ensure_inputs(actual: usize, required: usize) -> Result<(), CliConfigError> {
    if actual < required {
        return Err(CliConfigError::TooFewInputs { required, actual });
    }
    Ok(())
}
