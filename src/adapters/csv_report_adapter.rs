//! CSV report adapter implementing ReportPort.
//!
//! Writes `date,open,high,low,close,volume` (optional) followed by one column
//! per requested key. A key missing on a bar becomes an empty cell.

use crate::domain::error::KlineError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::report_port::ReportPort;
use std::io::Write;

const OHLCV_HEADER: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

#[derive(Debug, Clone)]
pub struct CsvReportAdapter {
    include_ohlcv: bool,
    precision: Option<usize>,
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new(true, None)
    }
}

impl CsvReportAdapter {
    pub fn new(include_ohlcv: bool, precision: Option<usize>) -> Self {
        Self {
            include_ohlcv,
            precision,
        }
    }

    fn format_value(&self, value: f64) -> String {
        match self.precision {
            Some(p) => format!("{:.*}", p, value),
            None => value.to_string(),
        }
    }
}

fn csv_error(e: csv::Error) -> KlineError {
    KlineError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_report(
        &self,
        bars: &[OhlcvBar],
        keys: &[String],
        out: &mut dyn Write,
    ) -> Result<(), KlineError> {
        let mut wtr = csv::Writer::from_writer(out);

        let mut header: Vec<&str> = Vec::with_capacity(OHLCV_HEADER.len() + keys.len());
        if self.include_ohlcv {
            header.extend(OHLCV_HEADER);
        }
        header.extend(keys.iter().map(String::as_str));
        wtr.write_record(&header).map_err(csv_error)?;

        for bar in bars {
            let mut row: Vec<String> = Vec::with_capacity(header.len());
            if self.include_ohlcv {
                row.push(bar.date.format("%Y-%m-%d").to_string());
                for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
                    row.push(self.format_value(v));
                }
            }
            for key in keys {
                row.push(
                    bar.ext(key)
                        .map(|v| self.format_value(v))
                        .unwrap_or_default(),
                );
            }
            wtr.write_record(&row).map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
