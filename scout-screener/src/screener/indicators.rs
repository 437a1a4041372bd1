//! Indicator engine.
//!
//! Computes the technical columns the scoring rules read:
//!
//! | Column | Window | Defined from index |
//! |--------|--------|--------------------|
//! | RSI (Wilder) | 14 | 14 |
//! | SMA of close | 50 | 49 |
//! | SMA of close | 200 | 199 |
//! | Mean of volume | 20 | 19 |
//!
//! Undefined values are `None`, never NaN.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::PriceSeries;

pub const RSI_PERIOD: usize = 14;
pub const SMA_FAST_PERIOD: usize = 50;
pub const SMA_SLOW_PERIOD: usize = 200;
pub const VOLUME_MA_PERIOD: usize = 20;

// ── SMA ──

/// Simple moving average. First `period-1` values are `None`.
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let len = data.len();
    let mut result = vec![None; len];
    if period == 0 || len < period {
        return result;
    }

    // Deviations from data[0] keep a constant series exact.
    let base = data[0];
    let mut sum: f64 = data[..period].iter().map(|v| v - base).sum();
    result[period - 1] = Some(base + sum / period as f64);
    for i in period..len {
        sum += (data[i] - base) - (data[i - period] - base);
        result[i] = Some(base + sum / period as f64);
    }
    result
}

// ── RSI ──

/// Relative Strength Index with Wilder smoothing. First `period` values are
/// `None`.
///
/// The first average gain/loss is the simple mean of the first `period`
/// changes; after that `avg = (prev * (period - 1) + current) / period`.
/// A flat window (no gains, no losses) reads 0; a window with gains and no
/// losses reads 100.
pub fn rsi(close: &[f64], period: usize) -> Vec<Option<f64>> {
    let len = close.len();
    let mut result = vec![None; len];
    if period == 0 || len < period + 1 {
        return result;
    }

    let mut gains = vec![0.0f64; len];
    let mut losses = vec![0.0f64; len];

    for i in 1..len {
        let change = close[i] - close[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else if change < 0.0 {
            losses[i] = -change;
        }
    }

    let mut avg_gain: f64 = gains[1..=period].iter().sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses[1..=period].iter().sum::<f64>() / period as f64;
    result[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..len {
        avg_gain = (avg_gain * (period as f64 - 1.0) + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + losses[i]) / period as f64;
        result[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
    }
}

// ── Frame ──

/// Latest indicator values for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
    pub rsi: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub volume_ma: Option<f64>,
}

/// A price series augmented with one value per point for every indicator.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
    pub rsi: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub sma200: Vec<Option<f64>>,
    pub volume_ma: Vec<Option<f64>>,
}

impl IndicatorFrame {
    /// Compute every indicator column for `series`.
    pub fn compute(series: &PriceSeries) -> Self {
        let closes = series.closes();
        let volumes = series.volumes();

        Self {
            dates: series.points().iter().map(|p| p.date).collect(),
            rsi: rsi(&closes, RSI_PERIOD),
            sma50: sma(&closes, SMA_FAST_PERIOD),
            sma200: sma(&closes, SMA_SLOW_PERIOD),
            volume_ma: sma(&volumes, VOLUME_MA_PERIOD),
            closes,
            volumes,
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Snapshot of the point at `index`.
    pub fn snapshot_at(&self, index: usize) -> Option<IndicatorSnapshot> {
        if index >= self.len() {
            return None;
        }

        Some(IndicatorSnapshot {
            date: self.dates[index],
            close: self.closes[index],
            volume: self.volumes[index],
            rsi: self.rsi[index],
            sma50: self.sma50[index],
            sma200: self.sma200[index],
            volume_ma: self.volume_ma[index],
        })
    }

    /// Snapshot of the most recent point.
    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(1).and_then(|i| self.snapshot_at(i))
    }
}

// ══════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use proptest::prelude::*;

    fn assert_approx(actual: Option<f64>, expected: f64, msg: &str) {
        let actual = actual.unwrap_or_else(|| panic!("{}: undefined", msg));
        assert!(
            (actual - expected).abs() < 1e-10,
            "{}: expected {}, got {}",
            msg,
            expected,
            actual
        );
    }

    /// Oscillating uptrend with both gains and losses.
    fn wave(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + 10.0 * (i as f64 * 0.37).sin() + i as f64 * 0.05)
            .collect()
    }

    fn series_from(closes: &[f64], volume: f64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, c)| PricePoint::flat(start + chrono::Duration::days(i as i64), *c, volume))
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let result = sma(&data, 3);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_approx(result[2], 2.0, "SMA[2]");
        assert_approx(result[3], 3.0, "SMA[3]");
        assert_approx(result[9], 9.0, "SMA[9]");
    }

    #[test]
    fn test_sma_short_or_zero_period_is_undefined() {
        assert!(sma(&[1.0, 2.0], 3).iter().all(Option::is_none));
        assert!(sma(&[1.0, 2.0], 0).iter().all(Option::is_none));
        assert!(sma(&[], 5).is_empty());
    }

    #[test]
    fn test_sma_constant_series_is_exact() {
        for price in [100.0, 0.1, 37.37, 1234.5678] {
            let data = vec![price; 250];
            for period in [1, 20, 50, 200, 250] {
                let result = sma(&data, period);
                for value in result.iter().skip(period - 1) {
                    assert_eq!(*value, Some(price), "period {} price {}", period, price);
                }
            }
        }
    }


    #[test]
    fn test_rsi_known_sequence() {
        let data = vec![
            44.0, 44.34, 44.09, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ];
        let result = rsi(&data, 14);

        assert!(result[13].is_none());
        // Seeded with simple means of the first 14 changes, then Wilder-smoothed.
        let expected = [
            72.98387096774191,
            68.80116959064324,
            69.00612235777805,
            71.55510475787847,
            68.52074087518383,
            60.13716896582762,
        ];
        for (i, value) in expected.iter().enumerate() {
            assert_approx(result[14 + i], *value, &format!("RSI[{}]", 14 + i));
        }
    }

    proptest! {
        #[test]
        fn prop_rsi_bounded_with_undefined_prefix(
            closes in prop::collection::vec(1.0..1000.0f64, 15..400),
        ) {
            let result = rsi(&closes, RSI_PERIOD);
            prop_assert_eq!(result.len(), closes.len());

            for (i, value) in result.iter().enumerate() {
                match value {
                    None => prop_assert!(i < RSI_PERIOD, "RSI[{}] undefined", i),
                    Some(v) => {
                        prop_assert!(i >= RSI_PERIOD, "RSI[{}] defined too early", i);
                        prop_assert!((0.0..=100.0).contains(v), "RSI[{}] = {}", i, v);
                    }
                }
            }
        }

        #[test]
        fn prop_sma_of_constant_series_is_the_constant(
            price in 0.01..10_000.0f64,
            len in 1usize..300,
            period in 1usize..250,
        ) {
            let result = sma(&vec![price; len], period);
            for (i, value) in result.iter().enumerate() {
                if i + 1 >= period {
                    prop_assert_eq!(*value, Some(price));
                } else {
                    prop_assert_eq!(*value, None);
                }
            }
        }
    }

    #[test]
    fn test_rsi_saturation_conventions() {
        let flat = vec![100.0; 30];
        assert!(rsi(&flat, 14)[14..].iter().all(|v| *v == Some(0.0)));

        let rising: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&rising, 14)[14..].iter().all(|v| *v == Some(100.0)));

        let falling: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        assert!(rsi(&falling, 14)[14..].iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_frame_latest_snapshot() {
        let closes = wave(250);
        let series = series_from(&closes, 5_000.0);
        let frame = IndicatorFrame::compute(&series);

        assert_eq!(frame.len(), 250);
        let latest = frame.latest().unwrap();
        assert_eq!(latest.close, closes[249]);
        assert_eq!(latest.volume, 5_000.0);
        assert!(latest.rsi.is_some());
        assert!(latest.sma50.is_some());
        assert!(latest.sma200.is_some());
        assert_eq!(latest.volume_ma, Some(5_000.0));
    }

    #[test]
    fn test_frame_undefined_columns_before_window() {
        let series = series_from(&wave(120), 1.0);
        let frame = IndicatorFrame::compute(&series);
        let latest = frame.latest().unwrap();

        assert!(latest.sma50.is_some());
        assert!(latest.sma200.is_none());
        assert!(frame.snapshot_at(48).unwrap().sma50.is_none());
        assert!(frame.snapshot_at(18).unwrap().volume_ma.is_none());
        assert!(frame.snapshot_at(19).unwrap().volume_ma.is_some());
        assert!(frame.snapshot_at(120).is_none());
    }

    #[test]
    fn test_frame_of_flat_series() {
        let series = series_from(&[100.0; 250], 1_000.0);
        let latest = IndicatorFrame::compute(&series).latest().unwrap();

        assert_eq!(latest.sma50, Some(100.0));
        assert_eq!(latest.sma200, Some(100.0));
        assert_eq!(latest.rsi, Some(0.0));
        assert_eq!(latest.volume_ma, Some(1_000.0));
    }
}
