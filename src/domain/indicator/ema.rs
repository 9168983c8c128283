//! Exponential Moving Average indicator.
//!
//! EMA[0] = x[0], then EMA[i] = EMA[i-1] + (x[i] - EMA[i-1]) * 2/(n+1).
//! No warmup: the first observation seeds the recurrence.

use crate::domain::indicator::key::{self, build_key};
use crate::domain::ohlcv::OhlcvBar;

pub fn ema_values(values: &[f64], window: usize) -> Vec<f64> {
    let divisor = window as f64 + 1.0;
    let mut out = Vec::with_capacity(values.len());
    let mut prev = 0.0;

    for (i, &x) in values.iter().enumerate() {
        let ema = if i == 0 {
            x
        } else {
            prev + (x - prev) * 2.0 / divisor
        };
        out.push(ema);
        prev = ema;
    }
    out
}

/// Writes `EMA_{n}_Timeline` / `EMA_{n}_Volume` and returns the close series.
pub fn apply_ema(bars: &mut [OhlcvBar], window: usize, section: Option<&str>) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let price_ema = ema_values(&closes, window);
    let volume_ema = ema_values(&volumes, window);

    let price_key = build_key(key::EMA, &[window], key::TIMELINE, section);
    let volume_key = build_key(key::EMA, &[window], key::VOLUME, section);

    for (bar, (&price, &volume)) in bars.iter_mut().zip(price_ema.iter().zip(&volume_ema)) {
        bar.set_ext(price_key.as_str(), price);
        bar.set_ext(volume_key.as_str(), volume);
    }
    price_ema
}
