//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! DIF = EMA(fast) - EMA(slow)
//! DEA = DEA' + (DIF - DEA') * 2/(signal+1), DEA' = 0 before the first bar
//! BAR = 2 * (DIF - DEA)
//!
//! Both EMAs are computed here, so their `EMA_*` keys are written as a side
//! effect and always match the requested periods.

use crate::domain::indicator::ema::apply_ema;
use crate::domain::indicator::key::{self, build_key};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn apply_macd(
    bars: &mut [OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
    section: Option<&str>,
) {
    let ema_fast = apply_ema(bars, fast, section);
    let ema_slow = apply_ema(bars, slow, section);

    let dif_key = build_key(key::MACD, &[], key::MACD_DIF, section);
    let dea_key = build_key(key::MACD, &[], key::MACD_DEA, section);
    let bar_key = build_key(key::MACD, &[], key::MACD_BAR, section);

    let divisor = signal_period as f64 + 1.0;
    let mut prev_dea = 0.0;

    for (bar, (fast_value, slow_value)) in bars.iter_mut().zip(ema_fast.into_iter().zip(ema_slow)) {
        let dif = fast_value - slow_value;
        let dea = prev_dea + (dif - prev_dea) * 2.0 / divisor;
        let histogram = 2.0 * (dif - dea);

        bar.set_ext(dif_key.as_str(), dif);
        bar.set_ext(dea_key.as_str(), dea);
        bar.set_ext(bar_key.as_str(), histogram);

        prev_dea = dea;
    }
}
