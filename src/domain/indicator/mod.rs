//! Technical indicator implementations.
//!
//! This module provides:
//! - `Indicator`: closed enum for indicator identity + parameters, with a
//!   single dispatch method ([`Indicator::apply`])
//! - `key`: the extension-store key naming shared by producers and consumers
//! - one submodule per algorithm family
//!
//! Every windowed computation shrinks its window at the start of the
//! sequence instead of leaving ramp-up bars empty.

pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod key;
pub mod ma;
pub mod macd;
pub mod parse;
pub mod timeline;

pub use ema::ema_values;
pub use ma::sma_values;
pub use parse::{parse_indicator, parse_indicator_list};

use crate::domain::error::KlineError;
use crate::domain::ohlcv::OhlcvBar;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indicator {
    #[default]
    None,
    Timeline,
    Ma(usize),
    Ema(usize),
    /// Only `period` drives the computation; the smoothing lengths are
    /// carried for configuration compatibility.
    Kdj {
        period: usize,
        k_smooth: usize,
        d_smooth: usize,
    },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Boll {
        period: usize,
        mult_x100: u32,
    },
}

/// First index of the trailing window ending at `i`, clamped to the start.
pub(crate) fn window_start(i: usize, window: usize) -> usize {
    (i + 1).saturating_sub(window)
}

impl Indicator {
    pub fn kdj_default() -> Self {
        Indicator::Kdj {
            period: kdj::DEFAULT_PERIOD,
            k_smooth: kdj::DEFAULT_K_SMOOTH,
            d_smooth: kdj::DEFAULT_D_SMOOTH,
        }
    }

    pub fn macd_default() -> Self {
        Indicator::Macd {
            fast: macd::DEFAULT_FAST,
            slow: macd::DEFAULT_SLOW,
            signal: macd::DEFAULT_SIGNAL,
        }
    }

    pub fn boll_default() -> Self {
        Indicator::Boll {
            period: bollinger::DEFAULT_PERIOD,
            mult_x100: bollinger::DEFAULT_MULT_X100,
        }
    }

    /// Namespace tag of the keys this indicator writes.
    pub fn tag(&self) -> &'static str {
        match self {
            Indicator::None => "",
            Indicator::Timeline => key::TIMELINE,
            Indicator::Ma(_) => key::MA,
            Indicator::Ema(_) => key::EMA,
            Indicator::Kdj { .. } => key::KDJ,
            Indicator::Macd { .. } => key::MACD,
            Indicator::Boll { .. } => key::BOLL,
        }
    }

    /// Full key for output `name`. MA and EMA include their window so that
    /// several instances coexist; `None` has no key.
    pub fn key(&self, name: &str, section: Option<&str>) -> String {
        match self {
            Indicator::None => String::new(),
            Indicator::Ma(window) | Indicator::Ema(window) => {
                key::build_key(self.tag(), &[*window], name, section)
            }
            _ => key::build_key(self.tag(), &[], name, section),
        }
    }

    /// Every key written by [`Indicator::apply`], own outputs first.
    pub fn output_keys(&self, section: Option<&str>) -> Vec<String> {
        let names: &[&str] = match self {
            Indicator::None => &[],
            Indicator::Timeline | Indicator::Ma(_) | Indicator::Ema(_) => {
                &[key::TIMELINE, key::VOLUME]
            }
            Indicator::Kdj { .. } => &[key::KDJ_K, key::KDJ_D, key::KDJ_J],
            Indicator::Macd { .. } => &[key::MACD_DIF, key::MACD_DEA, key::MACD_BAR],
            Indicator::Boll { .. } => &[key::BOLL_MID, key::BOLL_UPPER, key::BOLL_LOWER],
        };
        let mut keys: Vec<String> = names.iter().map(|n| self.key(n, section)).collect();

        if let Indicator::Macd { fast, slow, .. } = *self {
            for dependency in [Indicator::Ema(fast), Indicator::Ema(slow)] {
                for k in dependency.output_keys(section) {
                    if !keys.contains(&k) {
                        keys.push(k);
                    }
                }
            }
        }
        keys
    }

    fn check_positive(&self, param: &'static str, value: usize) -> Result<(), KlineError> {
        if value == 0 {
            return Err(KlineError::InvalidParameter {
                indicator: self.to_string(),
                param,
                value,
            });
        }
        Ok(())
    }

    /// Window and period parameters must be positive.
    pub fn validate_params(&self) -> Result<(), KlineError> {
        match *self {
            Indicator::None | Indicator::Timeline => {}
            Indicator::Ma(window) | Indicator::Ema(window) => {
                self.check_positive("window", window)?;
            }
            Indicator::Kdj { period, .. } => self.check_positive("period", period)?,
            Indicator::Macd { fast, slow, signal } => {
                self.check_positive("fast", fast)?;
                self.check_positive("slow", slow)?;
                self.check_positive("signal", signal)?;
            }
            Indicator::Boll { period, .. } => self.check_positive("period", period)?,
        }
        Ok(())
    }

    /// Check parameters and input once, before any recurrence runs.
    pub fn validate(&self, bars: &[OhlcvBar]) -> Result<(), KlineError> {
        self.validate_params()?;
        if bars.is_empty() && *self != Indicator::None {
            return Err(KlineError::EmptyInput {
                indicator: self.to_string(),
            });
        }
        Ok(())
    }

    /// Compute this indicator over `bars`, writing its keys into every bar's
    /// extension store. Re-running overwrites with identical values.
    pub fn apply(&self, bars: &mut [OhlcvBar], section: Option<&str>) -> Result<(), KlineError> {
        self.validate(bars)?;
        debug!(indicator = %self, bars = bars.len(), section = ?section, "applying indicator");

        match *self {
            Indicator::None => {}
            Indicator::Timeline => timeline::apply_timeline(bars, section),
            Indicator::Ma(window) => ma::apply_ma(bars, window, section),
            Indicator::Ema(window) => {
                ema::apply_ema(bars, window, section);
            }
            Indicator::Kdj { period, .. } => kdj::apply_kdj(bars, period, section),
            Indicator::Macd { fast, slow, signal } => {
                macd::apply_macd(bars, fast, slow, signal, section)
            }
            Indicator::Boll { period, mult_x100 } => {
                bollinger::apply_bollinger(bars, period, mult_x100, section)
            }
        }
        Ok(())
    }

    /// Ownership-passing form of [`Indicator::apply`].
    pub fn compute(
        &self,
        mut bars: Vec<OhlcvBar>,
        section: Option<&str>,
    ) -> Result<Vec<OhlcvBar>, KlineError> {
        self.apply(&mut bars, section)?;
        Ok(bars)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::None => write!(f, "NONE"),
            Indicator::Timeline => write!(f, "TIMELINE"),
            Indicator::Ma(window) => write!(f, "MA({})", window),
            Indicator::Ema(window) => write!(f, "EMA({})", window),
            Indicator::Kdj {
                period,
                k_smooth,
                d_smooth,
            } => write!(f, "KDJ({},{},{})", period, k_smooth, d_smooth),
            Indicator::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            Indicator::Boll { period, mult_x100 } => {
                let mult = f64::from(*mult_x100) / 100.0;
                write!(f, "BOLL({},{})", period, mult)
            }
        }
    }
}
