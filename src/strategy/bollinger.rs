use crate::error::{StatsError, StatsResult};
use crate::math::descriptive::{bollinger_bands_with_width, BollingerBands, DEFAULT_BAND_WIDTH};
use crate::strategy::BandSignal;
use tracing::debug;

/// Mean-reversion rule on Bollinger bands: sell the upper band, buy the lower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerReversion {
    window: usize,
    num_std: f64,
}

impl BollingerReversion {
    /// Creates a new band rule at the default ±2σ width.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            num_std: DEFAULT_BAND_WIDTH,
        }
    }

    pub fn with_num_std(mut self, num_std: f64) -> Self {
        self.num_std = num_std;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn num_std(&self) -> f64 {
        self.num_std
    }

    /// Bands over `closes`, or `None` while the window is not yet filled.
    fn bands(&self, closes: &[f64]) -> StatsResult<Option<BollingerBands>> {
        match bollinger_bands_with_width(closes, self.window, self.num_std) {
            Ok(bands) => Ok(Some(bands)),
            Err(StatsError::InsufficientData { required, actual }) => {
                debug!(required, actual, "Not enough closes for a band");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Generates a trading signal for the latest close.
    pub fn get_latest_signal(&self, closes: &[f64]) -> StatsResult<BandSignal> {
        let Some(&price) = closes.last() else {
            return Ok(BandSignal::Hold);
        };
        Ok(match self.bands(closes)? {
            Some(bands) => BandSignal::evaluate(price, &bands),
            None => BandSignal::Hold,
        })
    }

    /// One signal per close, `Hold` wherever no band exists yet.
    pub fn generate_signals(&self, closes: &[f64]) -> StatsResult<Vec<BandSignal>> {
        let Some(bands) = self.bands(closes)? else {
            return Ok(vec![BandSignal::Hold; closes.len()]);
        };

        Ok(closes
            .iter()
            .enumerate()
            .map(|(i, &price)| match (bands.lower[i], bands.upper[i]) {
                (Some(lower), Some(upper)) => BandSignal::against(price, lower, upper),
                _ => BandSignal::Hold,
            })
            .collect())
    }
}

/// Signal for the last close against bands over `window` closes at ±`num_std`.
///
/// # Errors
/// `InvalidParameter` for a zero window or a bad width. A series too short for
/// a band is not an error and yields `Hold`.
pub fn latest_band_signal(closes: &[f64], window: usize, num_std: f64) -> StatsResult<BandSignal> {
    BollingerReversion::new(window)
        .with_num_std(num_std)
        .get_latest_signal(closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oscillating_then(last: f64) -> Vec<f64> {
        let mut closes: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        closes.push(last);
        closes
    }

    #[test]
    fn test_spike_above_band_sells() {
        let closes = oscillating_then(110.0);
        assert_eq!(latest_band_signal(&closes, 20, 2.0).unwrap(), BandSignal::Sell);
    }

    #[test]
    fn test_drop_below_band_buys() {
        let closes = oscillating_then(90.0);
        assert_eq!(latest_band_signal(&closes, 20, 2.0).unwrap(), BandSignal::Buy);
    }

    #[test]
    fn test_inside_band_holds() {
        let closes = oscillating_then(100.5);
        assert_eq!(latest_band_signal(&closes, 20, 2.0).unwrap(), BandSignal::Hold);
    }

    #[test]
    fn test_short_series_holds() {
        assert_eq!(latest_band_signal(&[1.0, 2.0], 20, 2.0).unwrap(), BandSignal::Hold);
        assert_eq!(latest_band_signal(&[], 20, 2.0).unwrap(), BandSignal::Hold);
    }

    #[test]
    fn test_bad_parameters_rejected() {
        let closes = oscillating_then(100.0);
        assert!(matches!(
            latest_band_signal(&closes, 0, 2.0),
            Err(StatsError::InvalidParameter(_))
        ));
        assert!(matches!(
            latest_band_signal(&closes, 5, f64::NAN),
            Err(StatsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_generate_signals_aligned() {
        let strategy = BollingerReversion::new(4).with_num_std(1.0);
        let closes = [10.0, 11.0, 10.0, 11.0, 12.0, 9.0];
        let signals = strategy.generate_signals(&closes).unwrap();

        assert_eq!(signals.len(), closes.len());
        assert!(signals[..4].iter().all(|s| *s == BandSignal::Hold));
        assert_eq!(signals[4], BandSignal::Sell);
        assert_eq!(signals[5], BandSignal::Buy);
        assert_eq!(
            *signals.last().unwrap(),
            strategy.get_latest_signal(&closes).unwrap()
        );
    }
}
