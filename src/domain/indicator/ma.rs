//! Simple Moving Average indicator.
//!
//! MA(n)[i] = mean(x[i-n+1..=i]). While fewer than n bars exist the window
//! shrinks to bars 0..=i, so every bar gets a value.

use crate::domain::indicator::key::{self, build_key};
use crate::domain::indicator::window_start;
use crate::domain::ohlcv::OhlcvBar;

/// Trailing mean of `values` over `window`, with the shrinking start.
pub fn sma_values(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let slice = &values[window_start(i, window)..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

pub fn apply_ma(bars: &mut [OhlcvBar], window: usize, section: Option<&str>) {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let price_ma = sma_values(&closes, window);
    let volume_ma = sma_values(&volumes, window);

    let price_key = build_key(key::MA, &[window], key::TIMELINE, section);
    let volume_key = build_key(key::MA, &[window], key::VOLUME, section);

    for (bar, (price, volume)) in bars.iter_mut().zip(price_ma.into_iter().zip(volume_ma)) {
        bar.set_ext(price_key.as_str(), price);
        bar.set_ext(volume_key.as_str(), volume);
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
                    1000.0 * (i + 1) as f64,
                )
            })
            .collect()
    }

    #[test]
    fn ma_first_bar_is_close() {
        let values = sma_values(&[10.0, 20.0, 30.0], 5);
        assert_eq!(values[0], 10.0);
    }

    #[test]
    fn ma_shrinking_window() {
        let values = sma_values(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_relative_eq!(values[1], 15.0);
        assert_relative_eq!(values[2], 20.0);
        assert_relative_eq!(values[3], 30.0);
    }

    #[test]
    fn ma_window_1_is_identity() {
        let input = [3.0, 1.5, 7.25];
        assert_eq!(sma_values(&input, 1), input.to_vec());
    }

    #[test]
    fn ma_empty_input() {
        assert!(sma_values(&[], 5).is_empty());
    }

    #[test]
    fn ma_writes_price_and_volume() {
        let mut bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        apply_ma(&mut bars, 2, None);

        assert_relative_eq!(bars[0].ext("MA_2_Timeline").unwrap(), 10.0);
        assert_relative_eq!(bars[0].ext("MA_2_Volume").unwrap(), 1000.0);
        assert_relative_eq!(bars[3].ext("MA_2_Timeline").unwrap(), 35.0);
        assert_relative_eq!(bars[3].ext("MA_2_Volume").unwrap(), 3500.0);
    }

    #[test]
    fn ma_instances_coexist() {
        let mut bars = make_bars(&[10.0, 20.0, 30.0]);
        apply_ma(&mut bars, 2, None);
        apply_ma(&mut bars, 3, None);

        assert_relative_eq!(bars[2].ext("MA_2_Timeline").unwrap(), 25.0);
        assert_relative_eq!(bars[2].ext("MA_3_Timeline").unwrap(), 20.0);
    }
}
