//! Extension-store key naming.
//!
//! A key is `TAG[_PARAM...][_NAME][_SECTION]`, e.g. `MA_5_Timeline`,
//! `KDJ_K`, `EMA_12_Volume_main`. Producers and consumers both go through
//! [`build_key`] so the two sides never drift apart.

pub const TIMELINE: &str = "Timeline";
pub const VOLUME: &str = "Volume";
pub const MA: &str = "MA";
pub const EMA: &str = "EMA";
pub const KDJ: &str = "KDJ";
pub const MACD: &str = "MACD";
pub const BOLL: &str = "BOLL";

pub const KDJ_K: &str = "K";
pub const KDJ_D: &str = "D";
pub const KDJ_J: &str = "J";

pub const MACD_DIF: &str = "DIF";
pub const MACD_DEA: &str = "DEA";
pub const MACD_BAR: &str = "BAR";

pub const BOLL_MID: &str = "BOLL";
pub const BOLL_UPPER: &str = "UP";
pub const BOLL_LOWER: &str = "LB";

pub fn build_key(tag: &str, params: &[usize], name: &str, section: Option<&str>) -> String {
    let mut key = String::from(tag);
    for param in params {
        key.push('_');
        key.push_str(&param.to_string());
    }
    for part in [name, section.unwrap_or("")] {
        if !part.is_empty() {
            key.push('_');
            key.push_str(part);
        }
    }
    key
}
