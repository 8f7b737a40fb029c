//! Bracketed root finding.

/// Find `x` in `[lo, hi]` with `f(x) ≈ 0` by bisection.
///
/// Requires a sign change across the bracket. Stops once the bracket width falls
/// below `x_tol` (or stops shrinking in floating point) and returns the midpoint.
pub fn bisect<F>(f: F, lo: f64, hi: f64, x_tol: f64, max_iter: usize) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if !(f_lo.is_finite() && f_hi.is_finite()) {
        return None;
    }
    if f_lo == 0.0 {
        return Some(lo);
    }
    if f_hi == 0.0 {
        return Some(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return None;
    }

    for _ in 0..max_iter {
        let mid = 0.5 * (lo + hi);
        if hi - lo <= x_tol || mid <= lo || mid >= hi {
            return Some(mid);
        }
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            return None;
        }
        if f_mid == 0.0 {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Some(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bisect_finds_sqrt_two() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, 1e-14, 200).unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn bisect_requires_sign_change() {
        assert!(bisect(|x| x * x + 1.0, -1.0, 1.0, 1e-12, 100).is_none());
    }

    #[test]
    fn bisect_accepts_reversed_bracket() {
        let root = bisect(|x| x - 0.25, 1.0, 0.0, 1e-14, 200).unwrap();
        assert!((root - 0.25).abs() < 1e-12);
    }
}
