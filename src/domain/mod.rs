//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - curve families and their solved parameters (`CurveFamily`, `CurveParams`)
//! - boundary conditions and solver output (`BoundaryCondition`, `FitResult`)
//! - integration outputs (`CostEstimate`, `Quote`)
//! - run configuration and the exported curve file schema

pub mod types;

pub use types::*;
