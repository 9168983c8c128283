//! KDJ stochastic oscillator.
//!
//! RSV = (C - L) / (H - L) * 100 over the trailing `period` bars (shrinking
//! window), RSV = 0 when H == L.
//! K = (2K' + RSV)/3, D = (2D' + K)/3, J = 3K - 2D, with K' = D' = 50 before
//! the first bar.

use crate::domain::indicator::key::{self, build_key};
use crate::domain::indicator::window_start;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 9;
pub const DEFAULT_K_SMOOTH: usize = 3;
pub const DEFAULT_D_SMOOTH: usize = 3;

const SEED: f64 = 50.0;

/// Raw stochastic value for every bar.
pub fn rsv_values(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    (0..bars.len())
        .map(|i| {
            let window = &bars[window_start(i, period)..=i];
            let close = bars[i].close;
            let (high, low) = window
                .iter()
                .fold((bars[i].high, bars[i].low), |(h, l), b| {
                    (h.max(b.high), l.min(b.low))
                });

            if high == low {
                0.0
            } else {
                (close - low) / (high - low) * 100.0
            }
        })
        .collect()
}

pub fn apply_kdj(bars: &mut [OhlcvBar], period: usize, section: Option<&str>) {
    let rsv = rsv_values(bars, period);

    let k_key = build_key(key::KDJ, &[], key::KDJ_K, section);
    let d_key = build_key(key::KDJ, &[], key::KDJ_D, section);
    let j_key = build_key(key::KDJ, &[], key::KDJ_J, section);

    let mut prev_k = SEED;
    let mut prev_d = SEED;

    for (bar, rsv) in bars.iter_mut().zip(rsv) {
        let k = (2.0 * prev_k + rsv) / 3.0;
        let d = (2.0 * prev_d + k) / 3.0;
        let j = 3.0 * k - 2.0 * d;

        bar.set_ext(k_key.as_str(), k);
        bar.set_ext(d_key.as_str(), d);
        bar.set_ext(j_key.as_str(), j);

        prev_k = k;
        prev_d = d;
    }
}
