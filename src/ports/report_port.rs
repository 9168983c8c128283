//! Report output port trait.

use crate::domain::error::KlineError;
use crate::domain::ohlcv::OhlcvBar;
use std::io::Write;

/// Port for writing computed bars to the rendering side.
pub trait ReportPort {
    /// Write `bars` with one value column per entry in `keys`.
    fn write_report(
        &self,
        bars: &[OhlcvBar],
        keys: &[String],
        out: &mut dyn Write,
    ) -> Result<(), KlineError>;
}
