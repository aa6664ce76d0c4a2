//! Band-based signal evaluation.

pub mod bollinger;

pub use bollinger::{latest_band_signal, BollingerReversion};

use crate::math::descriptive::BollingerBands;
use serde::Serialize;
use std::fmt;

/// Represents a trading signal.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BandSignal {
    Buy,
    Sell,
    Hold,
}

impl BandSignal {
    /// Compare `price` with the most recent band.
    ///
    /// At or above the upper band is `Sell`, at or below the lower band is
    /// `Buy`. With no band yet (window not filled) the answer is `Hold`.
    pub fn evaluate(price: f64, bands: &BollingerBands) -> Self {
        match bands.latest() {
            Some((lower, _, upper)) => Self::against(price, lower, upper),
            None => Self::Hold,
        }
    }

    pub(crate) fn against(price: f64, lower: f64, upper: f64) -> Self {
        if price >= upper {
            Self::Sell
        } else if price <= lower {
            Self::Buy
        } else {
            Self::Hold
        }
    }
}

impl fmt::Display for BandSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}
