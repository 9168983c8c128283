//! OHLCV bar representation.
//!
//! Each bar carries an extension store holding indicator outputs, keyed by the
//! strings built in [`crate::domain::indicator::key`].

use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    ext: BTreeMap<String, f64>,
}

impl OhlcvBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            ext: BTreeMap::new(),
        }
    }

    /// Computed value stored under `key`, or `None` if nothing wrote it.
    pub fn ext(&self, key: &str) -> Option<f64> {
        self.ext.get(key).copied()
    }

    /// Write (or overwrite) a computed value.
    pub fn set_ext(&mut self, key: impl Into<String>, value: f64) {
        self.ext.insert(key.into(), value);
    }

    /// All keys present on this bar, in sorted order.
    pub fn ext_keys(&self) -> impl Iterator<Item = &str> {
        self.ext.keys().map(String::as_str)
    }

    /// high - low; negative when the bar is malformed.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
