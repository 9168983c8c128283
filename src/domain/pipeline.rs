//! Ordered application of indicators to one bar sequence.
//!
//! The built-in set is the closed [`Indicator`] enum. Algorithms defined
//! outside this crate plug in through the [`Algorithm`] trait and run in the
//! same pass, after or between the built-ins, in insertion order.

use crate::domain::error::KlineError;
use crate::domain::indicator::Indicator;
use crate::domain::ohlcv::OhlcvBar;
use tracing::{debug, info, warn};

/// Capability interface for externally registered algorithms.
pub trait Algorithm: Send + Sync {
    /// Display name used in logs and errors.
    fn name(&self) -> String;

    /// Keys this algorithm writes for `section`.
    fn output_keys(&self, section: Option<&str>) -> Vec<String>;

    /// Compute over the whole sequence, writing into each bar's extension store.
    fn handle(&self, bars: &mut [OhlcvBar], section: Option<&str>) -> Result<(), KlineError>;
}

impl Algorithm for Indicator {
    fn name(&self) -> String {
        self.to_string()
    }

    fn output_keys(&self, section: Option<&str>) -> Vec<String> {
        Indicator::output_keys(self, section)
    }

    fn handle(&self, bars: &mut [OhlcvBar], section: Option<&str>) -> Result<(), KlineError> {
        self.apply(bars, section)
    }
}

#[derive(Default)]
pub struct IndicatorPipeline {
    steps: Vec<Box<dyn Algorithm>>,
    section: Option<String>,
}

impl IndicatorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indicators(indicators: &[Indicator]) -> Self {
        let mut pipeline = Self::new();
        for indicator in indicators {
            pipeline.push(*indicator);
        }
        pipeline
    }

    /// Suffix appended to every key the pipeline writes.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        let section = section.into();
        self.section = if section.is_empty() {
            None
        } else {
            Some(section)
        };
        self
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn push(&mut self, indicator: Indicator) {
        self.steps.push(Box::new(indicator));
    }

    pub fn push_algorithm(&mut self, algorithm: Box<dyn Algorithm>) {
        self.steps.push(algorithm);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Union of all step output keys, first occurrence order.
    pub fn output_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for step in &self.steps {
            for key in step.output_keys(self.section()) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// Run every step in order. Stops at the first failing step; bars already
    /// written by earlier steps keep their values. Empty input is left to each
    /// step, so a pipeline of `None` accepts it.
    pub fn run(&self, bars: &mut [OhlcvBar]) -> Result<(), KlineError> {
        let malformed = bars.iter().filter(|b| b.range() < 0.0).count();
        if malformed > 0 {
            warn!(malformed, "bars with high < low give degenerate RSV and BOLL ranges");
        }

        for step in &self.steps {
            debug!(step = %step.name(), "running pipeline step");
            step.handle(bars, self.section())?;
        }
        info!(
            steps = self.steps.len(),
            bars = bars.len(),
            "pipeline complete"
        );
        Ok(())
    }
}
