//! Timeline: close and volume copied verbatim into the extension store.

use crate::domain::indicator::key::{self, build_key};
use crate::domain::ohlcv::OhlcvBar;

pub fn apply_timeline(bars: &mut [OhlcvBar], section: Option<&str>) {
    let price_key = build_key(key::TIMELINE, &[], key::TIMELINE, section);
    let volume_key = build_key(key::TIMELINE, &[], key::VOLUME, section);

    for bar in bars.iter_mut() {
        let (close, volume) = (bar.close, bar.volume);
        bar.set_ext(price_key.as_str(), close);
        bar.set_ext(volume_key.as_str(), volume);
    }
}
