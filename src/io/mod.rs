//! Input/output helpers.
//!
//! - cost table exports (CSV) (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;

pub use curve::*;
pub use export::*;
