//! klinecalc: technical indicator engine for OHLCV bar sequences.
//!
//! Hexagonal architecture: indicator algorithms and the bar model in
//! [`domain`], port traits in [`ports`], file-based implementations in
//! [`adapters`], and the command-line front end in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
