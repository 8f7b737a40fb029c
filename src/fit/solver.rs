//! Closed-form parameter solving for each curve family.
//!
//! Given two boundary conditions `(x0, y0)` and `(x1, y1)` we solve:
//!
//! - quadratic `y = (x + b)^2 / a`: dividing the two equations gives
//!   `(x1 + b)^2 = r^2 (x0 + b)^2` with `r = sqrt(y1 / y0)`, so
//!   `x1 + b = ±r (x0 + b)`. Each sign yields one `b`, and `a = (x0 + b)^2 / y0`.
//! - exponential `y = k e^(x / a)`: `a = (x1 - x0) / ln(y1 / y0)` and
//!   `k = y0 e^(-x0 / a)`.
//! - reciprocal `y = a - b / (x + c)` with `c` fixed: linear in `(a, b)`.
//!
//! All algebraic solutions are returned; picking one is `selection`'s job.

use nalgebra::{DMatrix, DVector};

use crate::domain::{BoundaryCondition, CurveFamily, CurveParams};
use crate::error::AppError;
use crate::math::solve_least_squares;

/// Solve the boundary system for every algebraic solution of `family`.
///
/// Candidate order is stable: for the quadratic family the `-r` branch comes
/// first and the `+r` branch second.
pub fn solve_candidates(
    family: CurveFamily,
    lower: BoundaryCondition,
    upper: BoundaryCondition,
    offset: f64,
) -> Result<Vec<CurveParams>, AppError> {
    validate_boundaries(lower, upper)?;

    match family {
        CurveFamily::Quadratic => Ok(solve_quadratic(lower, upper)),
        CurveFamily::Exponential => solve_exponential(lower, upper).map(|p| vec![p]),
        CurveFamily::Reciprocal => solve_reciprocal(lower, upper, offset).map(|p| vec![p]),
    }
}

fn validate_boundaries(lower: BoundaryCondition, upper: BoundaryCondition) -> Result<(), AppError> {
    for bc in [lower, upper] {
        if !(bc.x.is_finite() && bc.y.is_finite()) {
            return Err(AppError::input(format!(
                "Boundary condition ({}, {}) must be finite.",
                bc.x, bc.y
            )));
        }
        if bc.y <= 0.0 {
            return Err(AppError::input(format!(
                "Boundary price must be positive (got y={} at x={:e}).",
                bc.y, bc.x
            )));
        }
    }
    if upper.x <= lower.x {
        return Err(AppError::input(format!(
            "Upper boundary x={:e} must be greater than lower boundary x={:e}.",
            upper.x, lower.x
        )));
    }
    Ok(())
}

fn solve_quadratic(lower: BoundaryCondition, upper: BoundaryCondition) -> Vec<CurveParams> {
    let (x0, y0) = (lower.x, lower.y);
    let x1 = upper.x;
    let r = (upper.y / y0).sqrt();

    let mut out = Vec::with_capacity(2);

    // x1 + b = -r (x0 + b)
    let b = -(x1 + r * x0) / (1.0 + r);
    out.push(CurveParams::Quadratic {
        a: (x0 + b) * (x0 + b) / y0,
        b,
    });

    // x1 + b = r (x0 + b); degenerate when the prices are equal.
    if r != 1.0 {
        let b = (x1 - r * x0) / (r - 1.0);
        out.push(CurveParams::Quadratic {
            a: (x0 + b) * (x0 + b) / y0,
            b,
        });
    }

    out
}

fn solve_exponential(lower: BoundaryCondition, upper: BoundaryCondition) -> Result<CurveParams, AppError> {
    let log_ratio = (upper.y / lower.y).ln();
    if log_ratio == 0.0 || !log_ratio.is_finite() {
        return Err(AppError::solve(format!(
            "Exponential family needs distinct boundary prices (y0={}, y1={}).",
            lower.y, upper.y
        )));
    }
    let a = (upper.x - lower.x) / log_ratio;
    let k = lower.y * (-lower.x / a).exp();
    Ok(CurveParams::Exponential { k, a })
}

fn solve_reciprocal(
    lower: BoundaryCondition,
    upper: BoundaryCondition,
    c: f64,
) -> Result<CurveParams, AppError> {
    let s = lower.x + c;
    if !(c.is_finite() && s > 0.0) {
        return Err(AppError::solve(format!(
            "Reciprocal offset c={c:e} puts the pole at or right of x={:e}.",
            lower.x
        )));
    }

    // Unknowns (a, b / s); the second column is s / (x + c), which lies in (0, 1].
    let x = DMatrix::from_row_slice(
        2,
        2,
        &[1.0, -s / (lower.x + c), 1.0, -s / (upper.x + c)],
    );
    let y = DVector::from_row_slice(&[lower.y, upper.y]);
    let beta = solve_least_squares(&x, &y)
        .ok_or_else(|| AppError::solve("Reciprocal boundary system is singular."))?;

    Ok(CurveParams::Reciprocal {
        a: beta[0],
        b: beta[1] * s,
        c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_RECIPROCAL_OFFSET, DEFAULT_Y0, DEFAULT_Y1, DOMAIN_MAX};
    use crate::models::predict;

    fn defaults() -> (BoundaryCondition, BoundaryCondition) {
        (
            BoundaryCondition::new(0.0, DEFAULT_Y0),
            BoundaryCondition::new(DOMAIN_MAX, DEFAULT_Y1),
        )
    }

    fn rel_err(a: f64, b: f64) -> f64 {
        (a - b).abs() / b.abs()
    }

    #[test]
    fn quadratic_candidates_satisfy_both_boundaries() {
        let (lo, hi) = defaults();
        let candidates = solve_candidates(CurveFamily::Quadratic, lo, hi, 0.0).unwrap();
        assert_eq!(candidates.len(), 2);
        for params in &candidates {
            assert!(rel_err(predict(params, lo.x), lo.y) < 1e-9, "{params:?}");
            assert!(rel_err(predict(params, hi.x), hi.y) < 1e-9, "{params:?}");
        }
    }

    #[test]
    fn quadratic_plus_branch_matches_plotted_curve() {
        let (lo, hi) = defaults();
        let candidates = solve_candidates(CurveFamily::Quadratic, lo, hi, 0.0).unwrap();
        let CurveParams::Quadratic { a, b } = candidates[1] else {
            panic!("expected quadratic params");
        };
        assert!(rel_err(b, 2.338_428_335_690_31e26) < 1e-9, "b={b:e}");
        assert!(rel_err(a, 3.905_890_772_256_67e43) < 1e-9, "a={a:e}");

        let CurveParams::Quadratic { b: b_neg, .. } = candidates[0] else {
            panic!("expected quadratic params");
        };
        assert!(b_neg < 0.0);
    }

    #[test]
    fn quadratic_equal_prices_yield_single_candidate() {
        let lo = BoundaryCondition::new(0.0, 5.0);
        let hi = BoundaryCondition::new(10.0, 5.0);
        let candidates = solve_candidates(CurveFamily::Quadratic, lo, hi, 0.0).unwrap();
        assert_eq!(candidates.len(), 1);
        let CurveParams::Quadratic { b, .. } = candidates[0] else {
            panic!("expected quadratic params");
        };
        assert!((b + 5.0).abs() < 1e-12);
    }

    #[test]
    fn exponential_matches_second_script() {
        let (lo, hi) = defaults();
        let candidates = solve_candidates(CurveFamily::Exponential, lo, hi, 0.0).unwrap();
        let CurveParams::Exponential { k, a } = candidates[0] else {
            panic!("expected exponential params");
        };
        assert_eq!(k, DEFAULT_Y0);
        assert!(rel_err(a, 2.444_288_978_785_683_3e26) < 1e-10, "a={a:e}");
        assert!(rel_err(predict(&candidates[0], DOMAIN_MAX), DEFAULT_Y1) < 1e-12);
    }

    #[test]
    fn exponential_with_shifted_lower_boundary() {
        let lo = BoundaryCondition::new(1e26, 2e9);
        let hi = BoundaryCondition::new(5e26, 8e9);
        let params = solve_candidates(CurveFamily::Exponential, lo, hi, 0.0).unwrap()[0];
        assert!(rel_err(predict(&params, lo.x), lo.y) < 1e-12);
        assert!(rel_err(predict(&params, hi.x), hi.y) < 1e-12);
    }

    #[test]
    fn exponential_rejects_flat_prices() {
        let lo = BoundaryCondition::new(0.0, 3.0);
        let hi = BoundaryCondition::new(1.0, 3.0);
        let err = solve_candidates(CurveFamily::Exponential, lo, hi, 0.0).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_SOLVE);
    }

    #[test]
    fn reciprocal_satisfies_both_boundaries() {
        let (lo, hi) = defaults();
        let params =
            solve_candidates(CurveFamily::Reciprocal, lo, hi, DEFAULT_RECIPROCAL_OFFSET).unwrap()[0];
        assert!(rel_err(predict(&params, lo.x), lo.y) < 1e-9, "{params:?}");
        assert!(rel_err(predict(&params, hi.x), hi.y) < 1e-9, "{params:?}");
        let CurveParams::Reciprocal { b, c, .. } = params else {
            panic!("expected reciprocal params");
        };
        assert!(b > 0.0);
        assert_eq!(c, DEFAULT_RECIPROCAL_OFFSET);
    }

    #[test]
    fn reciprocal_rejects_pole_inside_domain() {
        let (lo, hi) = defaults();
        let err = solve_candidates(CurveFamily::Reciprocal, lo, hi, -1e25).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_SOLVE);
    }

    #[test]
    fn rejects_invalid_boundaries() {
        let lo = BoundaryCondition::new(0.0, -1.0);
        let hi = BoundaryCondition::new(1.0, 2.0);
        assert!(solve_candidates(CurveFamily::Quadratic, lo, hi, 0.0).is_err());

        let lo = BoundaryCondition::new(2.0, 1.0);
        let hi = BoundaryCondition::new(1.0, 2.0);
        let err = solve_candidates(CurveFamily::Exponential, lo, hi, 0.0).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
