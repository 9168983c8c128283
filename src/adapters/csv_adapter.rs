//! CSV file data adapter.
//!
//! One file per instrument, `{base_path}/{code}.csv`, with the header
//! `date,open,high,low,close,volume`. Dates are `YYYY-MM-DD`.

use crate::domain::error::KlineError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, KlineError> {
    record
        .get(index)
        .ok_or_else(|| KlineError::Data {
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| KlineError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, KlineError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| KlineError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| KlineError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| KlineError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                KlineError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            bars.push(OhlcvBar::new(
                date,
                parse_field(&record, 1, "open")?,
                parse_field(&record, 2, "high")?,
                parse_field(&record, 3, "low")?,
                parse_field(&record, 4, "close")?,
                parse_field(&record, 5, "volume")?,
            ));
        }

        bars.sort_by_key(|b| b.date);
        debug!(code, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, KlineError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| KlineError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| KlineError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
