//! Remote data access.

pub mod sips;

pub use sips::{LookupTransport, SipsClient};
