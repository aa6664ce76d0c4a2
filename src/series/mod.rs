//! Series preparation
//!
//! Turns raw bar sequences into aligned numeric series. No interpolation is
//! performed: a timestamp missing from any input drops that observation from
//! every output, so aligned series can be shorter than their inputs.

use crate::types::{BarRecord, PriceField};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Two series restricted to their common timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub timestamps: Vec<DateTime<Utc>>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

/// Extract one price column, preserving length and order.
pub fn extract(bars: &[BarRecord], field: PriceField) -> Vec<f64> {
    bars.iter().map(|bar| bar.price(field)).collect()
}

/// Align two bar sequences on the intersection of their timestamps.
///
/// Output is in chronological order. If a sequence repeats a timestamp the
/// later bar wins.
pub fn align_pair(left: &[BarRecord], right: &[BarRecord], field: PriceField) -> AlignedPair {
    let mut aligned = align_many(&[left, right], field);
    let right_series = aligned.series.pop().unwrap_or_default();
    let left_series = aligned.series.pop().unwrap_or_default();

    AlignedPair {
        timestamps: aligned.timestamps,
        left: left_series,
        right: right_series,
    }
}

/// N series restricted to the timestamps present in all of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    /// One column per input, in input order
    pub series: Vec<Vec<f64>>,
}

/// Align any number of bar sequences on their common timestamps.
pub fn align_many(inputs: &[&[BarRecord]], field: PriceField) -> AlignedSeries {
    if inputs.is_empty() {
        return AlignedSeries::default();
    }

    let indexed: Vec<BTreeMap<DateTime<Utc>, f64>> = inputs
        .iter()
        .map(|bars| {
            bars.iter()
                .map(|bar| (bar.timestamp, bar.price(field)))
                .collect()
        })
        .collect();

    // BTreeMap iteration keeps the shared timestamps sorted
    let timestamps: Vec<DateTime<Utc>> = indexed[0]
        .keys()
        .filter(|ts| indexed[1..].iter().all(|map| map.contains_key(ts)))
        .copied()
        .collect();

    let series: Vec<Vec<f64>> = indexed
        .iter()
        .map(|map| timestamps.iter().map(|ts| map[ts]).collect())
        .collect();

    let dropped = inputs.iter().map(|bars| bars.len()).max().unwrap_or(0) - timestamps.len();
    if dropped > 0 {
        debug!(
            inputs = inputs.len(),
            kept = timestamps.len(),
            dropped,
            "Dropped unmatched timestamps during alignment"
        );
    }

    AlignedSeries { timestamps, series }
}

/// Compute log-spread between two price series
///
/// spread[i] = ln(a[i]) - ln(b[i]); pairs with a non-positive price are skipped.
pub fn log_spread(prices_a: &[f64], prices_b: &[f64]) -> Vec<f64> {
    prices_a
        .iter()
        .zip(prices_b.iter())
        .filter_map(|(a, b)| {
            if *a > 0.0 && *b > 0.0 {
                Some(a.ln() - b.ln())
            } else {
                None
            }
        })
        .collect()
}
