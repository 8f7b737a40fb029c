//! Mathematical utilities: quadrature, root bracketing, and least squares.

pub mod ols;
pub mod quadrature;
pub mod roots;

pub use ols::*;
pub use quadrature::*;
pub use roots::*;
