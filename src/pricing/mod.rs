//! Pricing: cost tables and trade quotes on a fitted curve.

pub mod cost;
pub mod quote;

pub use cost::*;
pub use quote::*;
