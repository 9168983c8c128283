//! Data access port trait.

use crate::domain::error::KlineError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Bars for `code`, ordered oldest first.
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, KlineError>;

    fn list_symbols(&self) -> Result<Vec<String>, KlineError>;
}
