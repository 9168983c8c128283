#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use klinecalc::domain::error::KlineError;
pub use klinecalc::domain::ohlcv::OhlcvBar;
use klinecalc::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, KlineError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(KlineError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, KlineError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(i as u64))
        .unwrap()
}

pub fn make_bar(i: usize, high: f64, low: f64, close: f64, volume: f64) -> OhlcvBar {
    OhlcvBar::new(day(i), close, high, low, close, volume)
}

/// Bars with open = high = low = close and constant volume.
pub fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c, c, c, 1000.0))
        .collect()
}

/// A deterministic zig-zag series with a real high/low range.
pub fn zigzag_bars(n: usize) -> Vec<OhlcvBar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i % 7) as f64 * 1.5 - (i % 3) as f64;
            make_bar(i, close + 2.0, close - 1.5, close, 1000.0 + (i * 37 % 500) as f64)
        })
        .collect()
}

pub fn ext(bar: &OhlcvBar, key: &str) -> f64 {
    bar.ext(key)
        .unwrap_or_else(|| panic!("missing key {key} on {}", bar.date))
}
