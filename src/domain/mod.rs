//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod ohlcv;
pub mod pipeline;
