//! Error types for screening configuration

use thiserror::Error;

/// Errors raised while loading or validating a [`super::ScreeningConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
