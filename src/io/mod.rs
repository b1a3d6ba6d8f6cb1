//! Input/output helpers.
//!
//! - saved service responses (`payload`)
//! - display-model exports (`export`)

pub mod export;
pub mod payload;

pub use export::*;
pub use payload::*;
