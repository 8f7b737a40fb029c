//! Root selection among the algebraic solutions of the boundary system.
//!
//! Every candidate is checked against a validity predicate:
//! 1. all parameters finite
//! 2. both boundary conditions reproduced (relative tolerance `BOUNDARY_RTOL`)
//! 3. family-specific shape rules: positive scale, no pole in the domain, and a
//!    price that never falls between the two boundaries
//!
//! By default the first valid candidate wins. A fixed index can still be forced
//! for reproducing older runs; an invalid forced pick is logged, not rejected.

use crate::domain::{
    BoundaryCondition, CurveConfig, CurveParams, FitResult, RootCandidate, RootSelection,
};
use crate::error::AppError;
use crate::fit::solver::solve_candidates;
use crate::models::predict;

/// Relative tolerance for reproducing a boundary price.
const BOUNDARY_RTOL: f64 = 1e-9;

/// Solve the configured family and pick one solution.
pub fn fit_and_select(config: &CurveConfig) -> Result<FitResult, AppError> {
    let solutions = solve_candidates(config.family, config.lower, config.upper, config.offset)?;

    let candidates: Vec<RootCandidate> = solutions
        .into_iter()
        .map(|params| RootCandidate {
            params,
            rejection: check_candidate(&params, config.lower, config.upper),
        })
        .collect();

    for (idx, c) in candidates.iter().enumerate() {
        tracing::debug!(idx, params = ?c.params, rejection = ?c.rejection, "root candidate");
    }

    let selected = select_root(&candidates, config.root)?;
    let params = candidates[selected].params;
    tracing::info!(family = ?config.family, selected, ?params, "solved curve parameters");

    Ok(FitResult {
        family: config.family,
        lower: config.lower,
        upper: config.upper,
        candidates,
        selected,
        params,
    })
}

/// Pick a candidate index according to `selection`.
pub fn select_root(candidates: &[RootCandidate], selection: RootSelection) -> Result<usize, AppError> {
    if candidates.is_empty() {
        return Err(AppError::solve("Boundary system has no solutions."));
    }

    match selection {
        RootSelection::Index(idx) => {
            let Some(c) = candidates.get(idx) else {
                return Err(AppError::solve(format!(
                    "Root index {idx} out of range ({} candidate(s)).",
                    candidates.len()
                )));
            };
            if let Some(reason) = &c.rejection {
                tracing::warn!(idx, reason = %reason, "forced root fails the validity check");
            }
            Ok(idx)
        }
        RootSelection::FirstValid => candidates
            .iter()
            .position(RootCandidate::is_valid)
            .ok_or_else(|| {
                let reasons: Vec<String> = candidates
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("[{i}] {}", c.rejection.as_deref().unwrap_or("")))
                    .collect();
                AppError::solve(format!(
                    "No valid curve solution: {}",
                    reasons.join("; ")
                ))
            }),
    }
}

/// Return `Some(reason)` when `params` is not an acceptable pricing curve.
pub fn check_candidate(
    params: &CurveParams,
    lower: BoundaryCondition,
    upper: BoundaryCondition,
) -> Option<String> {
    if !params.is_finite() {
        return Some("non-finite parameters".to_string());
    }

    for bc in [lower, upper] {
        let y = predict(params, bc.x);
        if !((y - bc.y).abs() <= BOUNDARY_RTOL * bc.y.abs()) {
            return Some(format!("misses boundary y({:e})={} (got {y})", bc.x, bc.y));
        }
    }

    match *params {
        CurveParams::Quadratic { a, b } => {
            if a <= 0.0 {
                return Some(format!("scale a={a:e} must be positive"));
            }
            // Vertex at x = -b; the price falls to the left of it.
            if -b > lower.x {
                return Some(format!(
                    "price falls to zero at x={:e} before rising",
                    -b
                ));
            }
        }
        CurveParams::Exponential { k, a } => {
            if k <= 0.0 {
                return Some(format!("scale k={k:e} must be positive"));
            }
            if a <= 0.0 {
                return Some(format!("rate a={a:e} makes the price fall with supply"));
            }
        }
        CurveParams::Reciprocal { b, c, .. } => {
            if lower.x.min(0.0) + c <= 0.0 {
                return Some(format!("pole at x={:e} lies inside the domain", -c));
            }
            if b <= 0.0 {
                return Some(format!("b={b:e} makes the price fall with supply"));
            }
        }
    }

    None
}
