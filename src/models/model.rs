//! Model evaluation for the quadratic / exponential / reciprocal families.
//!
//! The pipeline relies on two primitive operations:
//! - predict `y(x)` given solved parameters (for quadrature, plots, grids)
//! - the closed-form definite integral (for cross-checking quadrature and
//!   inverting the cumulative cost)
//!
//! The integrals are written in cancellation-free forms because the bounds
//! (~1e24..1e27) are tiny relative differences of large numbers near the
//! vertex/offset terms.

use crate::domain::CurveParams;

/// Predict the unit price `y(x)`.
pub fn predict(params: &CurveParams, x: f64) -> f64 {
    match *params {
        CurveParams::Quadratic { a, b } => {
            let u = x + b;
            u * u / a
        }
        CurveParams::Exponential { k, a } => k * (x / a).exp(),
        CurveParams::Reciprocal { a, b, c } => a - b / (x + c),
    }
}

/// Closed-form `∫ y(x) dx` over `[lo, hi]`.
pub fn exact_integral(params: &CurveParams, lo: f64, hi: f64) -> f64 {
    match *params {
        CurveParams::Quadratic { a, b } => {
            // ((hi+b)^3 - (lo+b)^3) / 3a, factored as (u - v)(u^2 + uv + v^2).
            let u = hi + b;
            let v = lo + b;
            (hi - lo) * (u * u + u * v + v * v) / (3.0 * a)
        }
        CurveParams::Exponential { k, a } => k * a * (lo / a).exp() * ((hi - lo) / a).exp_m1(),
        CurveParams::Reciprocal { a, b, c } => {
            a * (hi - lo) - b * ((hi - lo) / (lo + c)).ln_1p()
        }
    }
}

/// Render the fitted function with its numbers substituted, for legends.
pub fn formula(params: &CurveParams) -> String {
    match *params {
        CurveParams::Quadratic { a, b } => {
            format!("y = (x {} {:.6e})^2 / {:.6e}", sign(b), b.abs(), a)
        }
        CurveParams::Exponential { k, a } => format!("y = {k:.6e} * e^(x / {a:.6e})"),
        CurveParams::Reciprocal { a, b, c } => {
            format!("y = {a:.6e} - {b:.6e} / (x {} {:.6e})", sign(c), c.abs())
        }
    }
}

fn sign(v: f64) -> char {
    if v < 0.0 { '-' } else { '+' }
}

/// Evenly spaced samples of `y(x)` over `[x_min, x_max]`.
///
/// `n` is clamped to at least 2 so both endpoints are always present.
pub fn sample_curve(params: &CurveParams, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x_min + u * (x_max - x_min);
        out.push((x, predict(params, x)));
    }
    out
}
