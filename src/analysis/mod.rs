//! Time-series estimators.
//!
//! Mean-reversion diagnostics (Hurst exponent, OU half-life), the
//! stationarity oracle and the two cointegration testers built on it.

pub mod cointegration;
pub mod half_life;
pub mod hurst;
pub mod johansen;
pub mod stationarity;

pub use cointegration::{
    cointegration_test, cointegration_test_both, BidirectionalCointegration,
    PairCointegrationResult,
};
pub use half_life::{half_life, HalfLifeResult};
pub use hurst::{hurst_exponent, HurstResult};
pub use johansen::{johansen_test, JohansenResult, JohansenTest, DEFAULT_CRITICAL_VALUE};
pub use stationarity::{AdfTest, Significance, StationarityOracle, StationarityVerdict};
