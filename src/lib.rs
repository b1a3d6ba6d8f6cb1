//! `cups-lookup` library crate.
//!
//! The binary (`sips`) is a thin wrapper around this library so that:
//!
//! - validation and normalization are testable without a terminal or network
//! - the TUI and the one-shot CLI share the same lookup coordinator

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod normalize;
pub mod report;
pub mod tui;
