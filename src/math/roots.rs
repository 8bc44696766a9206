use super::TOLERANCE;

/// Real roots of `a*t^2 + b*t + c = 0`, sorted ascending.
///
/// Degenerates to the linear equation when `a` vanishes. Tangent roots are
/// reported once.
#[must_use]
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < TOLERANCE * TOLERANCE {
        if b.abs() < TOLERANCE * TOLERANCE {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    if disc == 0.0 {
        return vec![-b / (2.0 * a)];
    }

    // Numerically stable pair: avoid cancellation between -b and sqrt(disc).
    let sq = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sq);
    let (t1, t2) = if q == 0.0 {
        (-sq / (2.0 * a), sq / (2.0 * a))
    } else {
        (q / a, c / q)
    };
    if t1 <= t2 {
        vec![t1, t2]
    } else {
        vec![t2, t1]
    }
}

/// Parameter interval where `a*t^2 + b*t + c <= 0` for `a > 0`, if any.
#[must_use]
pub fn quadratic_nonpositive(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    match solve_quadratic(a, b, c).as_slice() {
        [t1, t2] => Some((*t1, *t2)),
        [t] if a.abs() >= TOLERANCE * TOLERANCE => Some((*t, *t)),
        _ => None,
    }
}

/// Refines a sign change of `f` on `[lo, hi]` by bisection.
///
/// `f(lo)` and `f(hi)` must have different signs (`<= 0` counts as negative).
pub fn bisect(mut lo: f64, mut hi: f64, f: impl Fn(f64) -> f64) -> f64 {
    let lo_inside = f(lo) <= 0.0;
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if (f(mid) <= 0.0) == lo_inside {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_roots_sorted() {
        let r = solve_quadratic(1.0, 0.0, -4.0);
        assert_eq!(r.len(), 2);
        assert!((r[0] + 2.0).abs() < 1e-14 && (r[1] - 2.0).abs() < 1e-14);
    }

    #[test]
    fn roots_without_cancellation() {
        // t^2 - 1e8 t + 1 = 0 has a tiny root near 1e-8.
        let r = solve_quadratic(1.0, -1e8, 1.0);
        assert!((r[0] - 1e-8).abs() < 1e-20);
    }

    #[test]
    fn no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
        assert!(quadratic_nonpositive(1.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn linear_fallback() {
        let r = solve_quadratic(0.0, 2.0, -4.0);
        assert_eq!(r, vec![2.0]);
    }

    #[test]
    fn bisect_finds_root() {
        let t = bisect(0.0, 2.0, |t| t * t - 2.0);
        assert!((t - 2.0_f64.sqrt()).abs() < 1e-14);
    }
}
