//! Common Types Module
//!
//! Market data records consumed by the series preparation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar as delivered by the market-data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    /// Bar open time (UTC)
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl BarRecord {
    /// Read a single price column from the bar.
    #[inline]
    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }
}

/// Price column that can be extracted from a bar sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceField::Open => write!(f, "open"),
            PriceField::High => write!(f, "high"),
            PriceField::Low => write!(f, "low"),
            PriceField::Close => write!(f, "close"),
        }
    }
}

impl std::str::FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" | "o" => Ok(Self::Open),
            "high" | "h" => Ok(Self::High),
            "low" | "l" => Ok(Self::Low),
            "close" | "c" => Ok(Self::Close),
            _ => Err(format!(
                "Unknown price field: '{}'. Use open, high, low or close",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_price_field_roundtrip() {
        for field in [
            PriceField::Open,
            PriceField::High,
            PriceField::Low,
            PriceField::Close,
        ] {
            assert_eq!(field.to_string().parse::<PriceField>(), Ok(field));
        }
        assert!("vwap".parse::<PriceField>().is_err());
    }

    #[test]
    fn test_bar_deserializes_from_json() {
        let json = r#"{"timestamp":"2025-02-03T19:36:00Z","open":383.495,"high":383.89,"low":383.49,"close":383.7,"volume":1200.0}"#;
        let bar: BarRecord = serde_json::from_str(json).unwrap();
        assert_eq!(bar.timestamp, Utc.with_ymd_and_hms(2025, 2, 3, 19, 36, 0).unwrap());
        assert_eq!(bar.price(PriceField::High), 383.89);
        assert_eq!(bar.price(PriceField::Close), 383.7);
    }
}
