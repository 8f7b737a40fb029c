//! Least squares solver.
//!
//! Linear curve families (parameters entering `y` linearly once any fixed
//! offsets are chosen) reduce to a small system `X β = y`. With exactly two
//! boundary conditions the system is square and the least squares solution is
//! the exact one; extra rows would turn it into a regular fit.
//!
//! Implementation choices:
//! - SVD handles square and tall systems alike.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Callers are expected to scale columns to comparable magnitudes; the
//!   singular value cut-off is absolute.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // A (near) zero singular value means the rows do not pin down the
    // parameters; report that rather than returning a minimum-norm guess.
    let smallest = svd.singular_values.iter().copied().fold(f64::INFINITY, f64::min);
    let largest = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    if !(largest > 0.0) || smallest / largest < 1e-12 || x.nrows() < x.ncols() {
        return None;
    }

    match svd.solve(y, 1e-14) {
        Ok(beta) if beta.iter().all(|v| v.is_finite()) => Some(beta),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_rejects_singular_system() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 1.0, 0.5]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_least_squares(&x, &y).is_none());
    }
}
