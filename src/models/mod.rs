//! Bonding curve family implementations.
//!
//! Models are implemented as small, pure functions so that solving, integration
//! and plotting code can stay generic over the family.

pub mod model;

pub use model::*;
