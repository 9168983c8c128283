//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) of close over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! The window shrinks at the start of the sequence exactly like MA, and the
//! SMA is computed here rather than read back from `MA_*` keys.
//!
//! Default multiplier: 2.0

use crate::domain::indicator::key::{self, build_key};
use crate::domain::indicator::ma::sma_values;
use crate::domain::indicator::window_start;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 200;

pub fn apply_bollinger(
    bars: &mut [OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
    section: Option<&str>,
) {
    let mult = f64::from(stddev_mult_x100) / 100.0;
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let middle = sma_values(&closes, period);

    let mid_key = build_key(key::BOLL, &[], key::BOLL_MID, section);
    let upper_key = build_key(key::BOLL, &[], key::BOLL_UPPER, section);
    let lower_key = build_key(key::BOLL, &[], key::BOLL_LOWER, section);

    for (i, bar) in bars.iter_mut().enumerate() {
        let window = &closes[window_start(i, period)..=i];
        let mid = middle[i];

        let variance: f64 = window
            .iter()
            .map(|c| {
                let diff = c - mid;
                diff * diff
            })
            .sum::<f64>()
            / window.len() as f64;

        let band = mult * variance.sqrt();

        bar.set_ext(mid_key.as_str(), mid);
        bar.set_ext(upper_key.as_str(), mid + band);
        bar.set_ext(lower_key.as_str(), mid - band);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                OhlcvBar::new(
                    NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                    close,
                    close,
                    close,
                    close,
                    1000.0,
                )
            })
            .collect()
    }

    fn bands(bar: &OhlcvBar) -> (f64, f64, f64) {
        (
            bar.ext("BOLL_UP").unwrap(),
            bar.ext("BOLL_BOLL").unwrap(),
            bar.ext("BOLL_LB").unwrap(),
        )
    }

    #[test]
    fn bollinger_constant_values() {
        let mut bars = make_bars(&[100.0; 5]);
        apply_bollinger(&mut bars, 3, DEFAULT_MULT_X100, None);

        for bar in &bars {
            let (upper, middle, lower) = bands(bar);
            assert_relative_eq!(middle, 100.0);
            assert_relative_eq!(upper, 100.0);
            assert_relative_eq!(lower, 100.0);
        }
    }

    #[test]
    fn bollinger_basic_calculation() {
        let mut bars = make_bars(&[10.0, 20.0, 30.0]);
        apply_bollinger(&mut bars, 3, 200, None);

        let (upper, middle, lower) = bands(&bars[2]);
        let expected_middle: f64 = 20.0;
        let variance: f64 = (100.0 + 0.0 + 100.0) / 3.0;
        let stddev = variance.sqrt();

        assert_relative_eq!(middle, expected_middle, epsilon = 1e-10);
        assert_relative_eq!(upper, expected_middle + 2.0 * stddev, epsilon = 1e-10);
        assert_relative_eq!(lower, expected_middle - 2.0 * stddev, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_shrinking_window() {
        let mut bars = make_bars(&[10.0, 20.0, 30.0]);
        apply_bollinger(&mut bars, 20, 200, None);

        // first bar: one observation, zero spread
        let (upper, middle, lower) = bands(&bars[0]);
        assert_relative_eq!(middle, 10.0);
        assert_relative_eq!(upper, 10.0);
        assert_relative_eq!(lower, 10.0);

        // second bar: window [10, 20], mean 15, stddev 5
        let (upper, middle, lower) = bands(&bars[1]);
        assert_relative_eq!(middle, 15.0);
        assert_relative_eq!(upper, 25.0);
        assert_relative_eq!(lower, 5.0);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let mut bars = make_bars(&[10.0, 20.0]);
        apply_bollinger(&mut bars, 2, 150, None);

        let (upper, middle, lower) = bands(&bars[1]);
        assert_relative_eq!(middle, 15.0);
        assert_relative_eq!(upper, 22.5);
        assert_relative_eq!(lower, 7.5);
    }

    #[test]
    fn bollinger_symmetry() {
        let mut bars = make_bars(&[10.0, 13.0, 9.5, 21.0, 17.25]);
        apply_bollinger(&mut bars, 3, 250, None);

        for bar in &bars {
            let (upper, middle, lower) = bands(bar);
            assert_relative_eq!(upper - middle, middle - lower, epsilon = 1e-10);
        }
    }

    #[test]
    fn bollinger_does_not_write_ma_keys() {
        let mut bars = make_bars(&[10.0, 20.0]);
        apply_bollinger(&mut bars, 2, 200, None);
        assert!(bars[1].ext("MA_2_Timeline").is_none());
    }
}
