//! Token acquisition cost via numerical integration of the price curve.
//!
//! The cost of moving supply from `lower` to `upper` (base units) is
//! `∫ y(x) dx / scale`. Quadrature provides the reported value and error
//! estimate; the closed-form integral is carried along as a cross-check.

use crate::domain::{CostEstimate, CurveParams, TOKEN_UNIT};
use crate::error::AppError;
use crate::math::{QuadratureOptions, integrate};
use crate::models::{exact_integral, predict};

/// Integrate the price over `[lower, upper]` (base units).
pub fn integrate_cost(
    params: &CurveParams,
    lower: f64,
    upper: f64,
    scale: f64,
    opts: &QuadratureOptions,
) -> Result<CostEstimate, AppError> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(AppError::input(format!("Cost scale must be positive (got {scale}).")));
    }

    let q = integrate(|x| predict(params, x), lower, upper, opts)?;
    let exact = exact_integral(params, lower, upper);

    tracing::debug!(
        lower,
        upper,
        value = q.value,
        abs_error = q.abs_error,
        evaluations = q.evaluations,
        subintervals = q.subintervals,
        "integrated price curve"
    );

    Ok(CostEstimate {
        tokens: (upper - lower) / TOKEN_UNIT,
        lower,
        upper,
        integral: q.value,
        abs_error: q.abs_error,
        converged: q.converged,
        cost: q.value / scale,
        exact_cost: exact / scale,
    })
}

/// Cost of buying each quantity (whole tokens) starting from zero supply.
///
/// Bounds are independent; the output keeps the input order.
pub fn cost_table(
    params: &CurveParams,
    bounds_tokens: &[f64],
    scale: f64,
    opts: &QuadratureOptions,
) -> Result<Vec<CostEstimate>, AppError> {
    bounds_tokens
        .iter()
        .map(|&tokens| {
            if !(tokens.is_finite() && tokens >= 0.0) {
                return Err(AppError::input(format!(
                    "Token quantity must be a non-negative number (got {tokens})."
                )));
            }
            integrate_cost(params, 0.0, tokens * TOKEN_UNIT, scale, opts)
        })
        .collect()
}

/// Short label for a token quantity, e.g. `1M`, `650M`, `1.5B`.
pub fn token_label(tokens: f64) -> String {
    let (value, suffix) = if tokens.abs() >= 1e9 {
        (tokens / 1e9, "B")
    } else if tokens.abs() >= 1e6 {
        (tokens / 1e6, "M")
    } else if tokens.abs() >= 1e3 {
        (tokens / 1e3, "K")
    } else {
        (tokens, "")
    };

    if (value - value.round()).abs() < 1e-9 {
        format!("{}{suffix}", value.round() as i64)
    } else {
        let txt = format!("{value:.3}");
        let txt = txt.trim_end_matches('0').trim_end_matches('.');
        format!("{txt}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{COST_SCALE, CurveConfig, CurveFamily, DEFAULT_COST_BOUNDS};
    use crate::fit::fit_and_select;

    fn fitted(family: CurveFamily) -> CurveParams {
        let config = CurveConfig {
            family,
            ..CurveConfig::default()
        };
        fit_and_select(&config).unwrap().params
    }

    #[test]
    fn first_million_tokens_cost_about_start_price() {
        // Near x = 0 the price is ~1.4e9 per unit, so 1e24 units cost ~1.4e33 raw.
        let params = fitted(CurveFamily::Quadratic);
        let est = integrate_cost(&params, 0.0, 1e24, COST_SCALE, &QuadratureOptions::default()).unwrap();
        assert!(est.converged);
        assert!((est.cost - 0.0014).abs() < 0.00002, "cost={}", est.cost);
        assert_eq!(est.tokens, 1_000_000.0);
    }

    #[test]
    fn cost_is_monotone_across_default_bounds() {
        for family in CurveFamily::ALL {
            let params = fitted(family);
            let table =
                cost_table(&params, &DEFAULT_COST_BOUNDS, COST_SCALE, &QuadratureOptions::default()).unwrap();
            assert_eq!(table.len(), DEFAULT_COST_BOUNDS.len());
            for pair in table.windows(2) {
                assert!(
                    pair[1].cost >= pair[0].cost,
                    "{family:?}: {} then {}",
                    pair[0].cost,
                    pair[1].cost
                );
            }
        }
    }

    #[test]
    fn integration_is_additive_within_reported_error() {
        let opts = QuadratureOptions::default();
        for family in CurveFamily::ALL {
            let params = fitted(family);
            for &tokens in &DEFAULT_COST_BOUNDS[..7] {
                let n = tokens * TOKEN_UNIT;
                let whole = integrate_cost(&params, 0.0, 2.0 * n, 1.0, &opts).unwrap();
                let left = integrate_cost(&params, 0.0, n, 1.0, &opts).unwrap();
                let right = integrate_cost(&params, n, 2.0 * n, 1.0, &opts).unwrap();

                let gap = (whole.integral - (left.integral + right.integral)).abs();
                let bound = whole.abs_error + left.abs_error + right.abs_error
                    + 1e-12 * whole.integral.abs();
                assert!(gap <= bound, "{family:?} n={n:e}: gap={gap:e} bound={bound:e}");
            }
        }
    }

    #[test]
    fn quadrature_agrees_with_closed_form() {
        for family in CurveFamily::ALL {
            let params = fitted(family);
            let table =
                cost_table(&params, &DEFAULT_COST_BOUNDS, COST_SCALE, &QuadratureOptions::default()).unwrap();
            for est in table {
                let rel = (est.cost - est.exact_cost).abs() / est.exact_cost.abs();
                assert!(rel < 1e-10, "{family:?} tokens={}: rel={rel:e}", est.tokens);
            }
        }
    }

    #[test]
    fn rejects_negative_quantities_and_bad_scale() {
        let params = fitted(CurveFamily::Quadratic);
        let opts = QuadratureOptions::default();
        assert!(cost_table(&params, &[-1.0], COST_SCALE, &opts).is_err());
        assert!(integrate_cost(&params, 0.0, 1.0, 0.0, &opts).is_err());
    }

    #[test]
    fn token_labels() {
        assert_eq!(token_label(1_000_000.0), "1M");
        assert_eq!(token_label(650_000_000.0), "650M");
        assert_eq!(token_label(1_500_000_000.0), "1.5B");
        assert_eq!(token_label(2_500.0), "2.5K");
        assert_eq!(token_label(12.0), "12");
    }
}
