//! Reporting utilities: text report and es-ES number formatting.

pub mod format;

pub use format::{format_kwh, format_number, format_report, format_share};
