//! Domain types used throughout the lookup pipeline.
//!
//! This module defines:
//!
//! - the validated identifier (`Cups`)
//! - the loosely-typed service payload (`LookupResponse`)
//! - the fully-resolved output (`DisplayModel`)

pub mod cups;
pub mod loose;
pub mod types;

pub use cups::Cups;
pub use types::*;
