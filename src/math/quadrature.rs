//! Adaptive Gauss–Kronrod quadrature.
//!
//! Each subinterval is evaluated with the 15-point Kronrod rule and its embedded
//! 7-point Gauss rule; the difference between the two drives the error estimate.
//! The subinterval with the largest error is bisected until the total error
//! meets `max(epsabs, epsrel * |value|)` or the subinterval limit is reached.
//!
//! Error scaling follows the classic QUADPACK `qk15` heuristics, which makes the
//! estimate conservative for smooth integrands and tight for polynomials (the
//! 15-point rule is exact up to degree 22).

use crate::error::AppError;

/// Kronrod abscissae on `[-1, 1]` (non-negative half, descending).
///
/// Odd indices are shared with the 7-point Gauss rule.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

/// Kronrod weights matching `XGK`.
const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for `XGK[1], XGK[3], XGK[5], XGK[7]`.
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Tolerances and limits for adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureOptions {
    pub epsabs: f64,
    pub epsrel: f64,
    /// Maximum number of subintervals.
    pub limit: usize,
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        Self {
            epsabs: 1.49e-8,
            epsrel: 1.49e-8,
            limit: 50,
        }
    }
}

/// Result of an adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    pub value: f64,
    pub abs_error: f64,
    /// Number of integrand evaluations.
    pub evaluations: usize,
    pub subintervals: usize,
    /// `false` when the subinterval limit was hit before the tolerance was met.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    lo: f64,
    hi: f64,
    value: f64,
    error: f64,
}

/// Integrate `f` over `[lo, hi]`.
///
/// Reversed bounds integrate the swapped interval and negate the result.
pub fn integrate<F>(f: F, lo: f64, hi: f64, opts: &QuadratureOptions) -> Result<Quadrature, AppError>
where
    F: Fn(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite()) {
        return Err(AppError::input(format!(
            "Integration bounds must be finite (got [{lo}, {hi}])."
        )));
    }
    if opts.limit == 0 || opts.epsabs < 0.0 || opts.epsrel < 0.0 {
        return Err(AppError::input("Invalid quadrature tolerances."));
    }
    if lo == hi {
        return Ok(Quadrature {
            value: 0.0,
            abs_error: 0.0,
            evaluations: 0,
            subintervals: 0,
            converged: true,
        });
    }
    if hi < lo {
        let mut q = integrate(f, hi, lo, opts)?;
        q.value = -q.value;
        return Ok(q);
    }

    let first = kronrod15(&f, lo, hi)?;
    let mut segments = vec![first];
    let mut evaluations = 15;

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        let tolerance = opts.epsabs.max(opts.epsrel * value.abs());

        if error <= tolerance {
            return Ok(Quadrature {
                value,
                abs_error: error,
                evaluations,
                subintervals: segments.len(),
                converged: true,
            });
        }

        if segments.len() >= opts.limit {
            tracing::warn!(
                lo,
                hi,
                value,
                error,
                limit = opts.limit,
                "quadrature hit the subinterval limit before reaching tolerance"
            );
            return Ok(Quadrature {
                value,
                abs_error: error,
                evaluations,
                subintervals: segments.len(),
                converged: false,
            });
        }

        // Bisect the worst segment.
        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.error.total_cmp(&b.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);
        let mid = 0.5 * (seg.lo + seg.hi);
        if mid <= seg.lo || mid >= seg.hi {
            // Interval can no longer be split in floating point.
            segments.push(seg);
            let value: f64 = segments.iter().map(|s| s.value).sum();
            let error: f64 = segments.iter().map(|s| s.error).sum();
            tracing::warn!(lo, hi, value, error, "quadrature interval underflow");
            return Ok(Quadrature {
                value,
                abs_error: error,
                evaluations,
                subintervals: segments.len(),
                converged: false,
            });
        }

        segments.push(kronrod15(&f, seg.lo, mid)?);
        segments.push(kronrod15(&f, mid, seg.hi)?);
        evaluations += 30;
    }
}

/// Single 15-point Kronrod pass with a 7-point Gauss error estimate.
fn kronrod15<F>(f: &F, lo: f64, hi: f64) -> Result<Segment, AppError>
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (lo + hi);
    let half = 0.5 * (hi - lo);

    let eval = |x: f64| -> Result<f64, AppError> {
        let v = f(x);
        if v.is_finite() {
            Ok(v)
        } else {
            Err(AppError::runtime(format!("Non-finite integrand value at x={x:e}.")))
        }
    };

    let fc = eval(center)?;
    let mut res_gauss = fc * WG[3];
    let mut res_kronrod = fc * WGK[7];
    let mut res_abs = res_kronrod.abs();

    let mut fv1 = [0.0_f64; 7];
    let mut fv2 = [0.0_f64; 7];

    for j in 0..7 {
        let dx = half * XGK[j];
        let f1 = eval(center - dx)?;
        let f2 = eval(center + dx)?;
        fv1[j] = f1;
        fv2[j] = f2;

        let sum = f1 + f2;
        res_kronrod += WGK[j] * sum;
        res_abs += WGK[j] * (f1.abs() + f2.abs());
        if j % 2 == 1 {
            res_gauss += WG[j / 2] * sum;
        }
    }

    let mean = 0.5 * res_kronrod;
    let mut res_asc = WGK[7] * (fc - mean).abs();
    for j in 0..7 {
        res_asc += WGK[j] * ((fv1[j] - mean).abs() + (fv2[j] - mean).abs());
    }

    let value = res_kronrod * half;
    let res_abs = res_abs * half.abs();
    let res_asc = res_asc * half.abs();
    let mut error = ((res_kronrod - res_gauss) * half).abs();

    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (200.0 * error / res_asc).powf(1.5).min(1.0);
    }
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * res_abs);
    }

    Ok(Segment {
        lo,
        hi,
        value,
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_err(a: f64, b: f64) -> f64 {
        (a - b).abs() / b.abs().max(1e-300)
    }

    #[test]
    fn integrates_polynomial_exactly() {
        let q = integrate(|x| 3.0 * x * x + 2.0 * x + 1.0, 0.0, 2.0, &QuadratureOptions::default()).unwrap();
        // x^3 + x^2 + x on [0, 2] = 8 + 4 + 2
        assert!(rel_err(q.value, 14.0) < 1e-14, "got {}", q.value);
        assert!(q.converged);
        assert_eq!(q.subintervals, 1);
    }

    #[test]
    fn integrates_oscillatory_function_adaptively() {
        let q = integrate(|x| (10.0 * x).sin(), 0.0, std::f64::consts::PI, &QuadratureOptions::default()).unwrap();
        // (1 - cos(10π)) / 10 = 0
        assert!(q.value.abs() < 1e-8, "got {}", q.value);
        assert!(q.converged);
        assert!(q.subintervals > 1);

        let q = integrate(|x| (-x * x).exp(), -5.0, 5.0, &QuadratureOptions::default()).unwrap();
        assert!(rel_err(q.value, std::f64::consts::PI.sqrt()) < 1e-9);
        assert!(q.converged);
    }

    #[test]
    fn reversed_and_empty_bounds() {
        let opts = QuadratureOptions::default();
        let fwd = integrate(|x| x, 0.0, 1.0, &opts).unwrap();
        let rev = integrate(|x| x, 1.0, 0.0, &opts).unwrap();
        assert!((fwd.value + rev.value).abs() < 1e-15);

        let empty = integrate(|x| x, 3.0, 3.0, &opts).unwrap();
        assert_eq!(empty.value, 0.0);
        assert_eq!(empty.evaluations, 0);
    }

    #[test]
    fn reports_non_convergence_instead_of_failing() {
        let opts = QuadratureOptions {
            epsabs: 0.0,
            epsrel: 1e-15,
            limit: 2,
        };
        let q = integrate(|x| 1.0 / x.sqrt(), 1e-12, 1.0, &opts).unwrap();
        assert!(!q.converged);
        assert!(q.subintervals <= 2);
        assert!(q.abs_error > 0.0);
    }

    #[test]
    fn rejects_non_finite_integrand() {
        let err = integrate(|_| f64::NAN, 0.0, 1.0, &QuadratureOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_RUNTIME);
    }
}
