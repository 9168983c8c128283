//! Configuration validation.
//!
//! Validates all config fields before any bars are loaded.

use crate::domain::error::KlineError;
use crate::domain::indicator::{parse_indicator_list, Indicator};
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub data_path: PathBuf,
    pub code: Option<String>,
    pub section: Option<String>,
    pub indicators: Vec<Indicator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub include_ohlcv: bool,
    pub precision: Option<usize>,
}

const MAX_PRECISION: i64 = 17;

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), KlineError> {
    validate_data_path(config)?;
    validate_indicators(config)?;
    build_output_config(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: String) -> KlineError {
    KlineError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

/// `[output] include_ohlcv` (default true) and `precision` (default: shortest
/// round-trip formatting).
pub fn build_output_config(config: &dyn ConfigPort) -> Result<OutputConfig, KlineError> {
    let include_ohlcv = config
        .get_bool("output", "include_ohlcv")
        .map_err(|reason| invalid("output", "include_ohlcv", reason))?
        .unwrap_or(true);

    let precision = match config
        .get_int("output", "precision")
        .map_err(|reason| invalid("output", "precision", reason))?
    {
        None => None,
        Some(p) if !(0..=MAX_PRECISION).contains(&p) => {
            return Err(invalid(
                "output",
                "precision",
                format!("precision must be between 0 and {}, got {}", MAX_PRECISION, p),
            ));
        }
        Some(p) => Some(p as usize),
    };

    Ok(OutputConfig {
        include_ohlcv,
        precision,
    })
}

pub fn build_engine_config(config: &dyn ConfigPort) -> Result<EngineConfig, KlineError> {
    let data_path = validate_data_path(config)?;
    let indicators = validate_indicators(config)?;

    let code = non_empty(config.get_string("data", "code"));
    let section = non_empty(config.get_string("engine", "section"));

    Ok(EngineConfig {
        data_path,
        code,
        section,
        indicators,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<PathBuf, KlineError> {
    match non_empty(config.get_string("data", "path")) {
        Some(path) => Ok(PathBuf::from(path)),
        None => Err(KlineError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_indicators(config: &dyn ConfigPort) -> Result<Vec<Indicator>, KlineError> {
    let raw = match non_empty(config.get_string("engine", "indicators")) {
        Some(s) => s,
        None => {
            return Err(KlineError::ConfigMissing {
                section: "engine".to_string(),
                key: "indicators".to_string(),
            })
        }
    };

    let indicators = parse_indicator_list(&raw)
        .map_err(|e| invalid("engine", "indicators", e.display_with_context(&raw)))?;

    for indicator in &indicators {
        indicator
            .validate_params()
            .map_err(|e| invalid("engine", "indicators", e.to_string()))?;
    }
    Ok(indicators)
}
