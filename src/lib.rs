//! Mean-reversion and cointegration statistics for price series.
//!
//! The engine ([`series`], [`math`], [`analysis`], [`strategy`], [`discovery`])
//! is pure computation over `f64` slices and never installs a log subscriber.
//! [`cli`], [`commands`] and [`observability`] make up the file-driven binary.

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod discovery;
pub mod error;
pub mod math;
pub mod observability;
pub mod series;
pub mod strategy;
pub mod types;

pub use error::{StatsError, StatsResult};
pub use types::{BarRecord, PriceField};
