//! Pair screening over a price universe.
//!
//! # Example
//!
//! ```ignore
//! use nexus::analysis::AdfTest;
//! use nexus::discovery::{screen_pairs, ScreeningConfig};
//!
//! let config = ScreeningConfig::default();
//! let pairs = screen_pairs(&prices, &config, &AdfTest::new());
//! ```

pub mod config;
pub mod error;
pub mod filter;

pub use config::ScreeningConfig;
pub use error::ConfigError;
pub use filter::{screen_pairs, CandidatePair};
