//! Response normalization and time-series shaping.
//!
//! - `dates`: heterogeneous date strings → comparable values
//! - `series`: consumption readings → sorted, labelled trend series
//! - `response`: lookup payload → `DisplayModel`

pub mod dates;
pub mod response;
pub mod series;

pub use dates::{NormalizedDate, normalize_date};
pub use response::normalize_response;
pub use series::build_consumption_series;
