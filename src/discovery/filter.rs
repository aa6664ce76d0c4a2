//! Statistical filtering for pair candidates
//!
//! Screens every unordered pair in a price universe through correlation,
//! two-way cointegration, half-life and Hurst filters.

use super::config::ScreeningConfig;
use crate::analysis::cointegration::cointegration_test_both;
use crate::analysis::half_life::half_life;
use crate::analysis::hurst::hurst_exponent;
use crate::analysis::stationarity::StationarityOracle;
use crate::error::StatsError;
use crate::math::descriptive::{correlation, std_dev};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A candidate pair that passed screening
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatePair {
    /// Regressand of the winning ordering
    pub dependent: String,
    /// Regressor of the winning ordering
    pub independent: String,
    /// Pearson correlation coefficient
    pub correlation: f64,
    /// Units of `independent` per unit of `dependent`
    pub hedge_ratio: f64,
    /// Stationarity statistic of the spread (more negative = stronger)
    pub statistic: f64,
    pub is_cointegrated: bool,
    /// Mean-reversion half-life of the spread, in periods
    pub half_life: f64,
    /// Hurst exponent of the spread; `None` when it could not be estimated
    pub hurst: Option<f64>,
    /// Spread standard deviation
    pub spread_std: f64,
}

/// Screen all unordered pairs of `prices`.
///
/// # Algorithm
/// 1. For each unique pair (a, b) in symbol order:
/// 2. Require equal lengths and correlation >= `min_correlation`
/// 3. Run the pairwise cointegration test both ways; keep the ordering with
///    the more negative statistic
/// 4. Reject if `require_cointegration` and that ordering is not cointegrated
/// 5. Half-life of the spread must be finite and <= `max_half_life`
/// 6. Hurst exponent of the spread must be <= `max_hurst` when it can be estimated
///
/// Results are sorted by statistic ascending and truncated to `max_pairs`.
/// Estimator failures skip the pair and are never fatal.
pub fn screen_pairs(
    prices: &HashMap<String, Vec<f64>>,
    config: &ScreeningConfig,
    oracle: &dyn StationarityOracle,
) -> Vec<CandidatePair> {
    let mut symbols: Vec<&String> = prices.keys().collect();
    symbols.sort();
    let mut results = Vec::new();

    info!(
        candidates = symbols.len(),
        min_corr = config.min_correlation,
        max_hl = config.max_half_life,
        max_hurst = config.max_hurst,
        require_coint = config.require_cointegration,
        "Screening pair candidates"
    );

    let mut rejected_coint = 0u32;

    for i in 0..symbols.len() {
        for j in (i + 1)..symbols.len() {
            let sym_a = symbols[i];
            let sym_b = symbols[j];
            let pair = format!("{}-{}", sym_a, sym_b);

            let series_a = &prices[sym_a];
            let series_b = &prices[sym_b];

            if series_a.len() != series_b.len() {
                warn!(a = %sym_a, b = %sym_b, "Length mismatch, skipping pair");
                continue;
            }

            let correlation = match correlation(series_a, series_b) {
                Ok(c) => c,
                Err(e) => {
                    debug!(pair = %pair, error = %e, "Correlation unavailable");
                    continue;
                }
            };
            if correlation < config.min_correlation {
                debug!(pair = %pair, corr = correlation, "Correlation too low");
                continue;
            }

            let both = match cointegration_test_both(series_a, series_b, config.adf_lag, oracle) {
                Ok(both) => both,
                Err(e) => {
                    warn!(pair = %pair, error = %e, "Cointegration test failed");
                    continue;
                }
            };
            let best = both.strongest();
            // y_on_x regresses b on a
            let (dependent, independent) = if std::ptr::eq(best, &both.y_on_x) {
                (sym_b, sym_a)
            } else {
                (sym_a, sym_b)
            };

            if config.require_cointegration && !best.is_cointegrated {
                debug!(
                    pair = %pair,
                    statistic = format!("{:.2}", best.statistic),
                    "Spread is non-stationary"
                );
                rejected_coint += 1;
                continue;
            }

            let half_life = match half_life(&best.residuals) {
                Ok(hl) => hl.periods,
                Err(StatsError::NotMeanReverting { slope }) => {
                    debug!(pair = %pair, slope, "Spread is not mean reverting");
                    continue;
                }
                Err(e) => {
                    warn!(pair = %pair, error = %e, "Half-life estimation failed");
                    continue;
                }
            };
            if half_life > config.max_half_life {
                debug!(pair = %pair, hl = half_life, "Half-life too long");
                continue;
            }

            let hurst = match hurst_exponent(&best.residuals) {
                Ok(h) => Some(h.exponent),
                Err(e) => {
                    debug!(pair = %pair, error = %e, "Hurst exponent unavailable");
                    None
                }
            };
            if let Some(h) = hurst {
                if h > config.max_hurst {
                    debug!(pair = %pair, hurst = h, "Hurst exponent too high");
                    continue;
                }
            }

            let spread_std = std_dev(&best.residuals).unwrap_or(0.0);

            info!(
                pair = %pair,
                correlation = format!("{:.3}", correlation),
                half_life = format!("{:.1}", half_life),
                statistic = format!("{:.2}", best.statistic),
                cointegrated = best.is_cointegrated,
                "Viable pair found"
            );

            results.push(CandidatePair {
                dependent: dependent.clone(),
                independent: independent.clone(),
                correlation,
                hedge_ratio: best.hedge_ratio,
                statistic: best.statistic,
                is_cointegrated: best.is_cointegrated,
                half_life,
                hurst,
                spread_std,
            });
        }
    }

    results.sort_by(|a, b| {
        a.statistic
            .partial_cmp(&b.statistic)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(config.max_pairs);

    info!(
        viable_pairs = results.len(),
        rejected_coint = rejected_coint,
        "Screening complete"
    );
    results
}
