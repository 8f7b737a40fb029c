//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - solve the two-point boundary system for each family in closed form
//! - validate every algebraic solution and select one

pub mod selection;
pub mod solver;

pub use selection::*;
pub use solver::*;
