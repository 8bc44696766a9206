//! Circular arcs in the meridional `(z, r)` half plane.
//!
//! Sign convention for the radius: a positive radius describes the arc half
//! with `r >= rc` (`r = rc + sqrt(rad^2 - (z - zc)^2)`), a negative radius the
//! half with `r <= rc`.
use super::{Point2, Vector2};

/// Center of the arc through `p0` and `p1` with the given signed radius.
///
/// Returns `None` when the radius is smaller than half the chord, in which
/// case no such circle exists.
#[must_use]
pub fn arc_center(p0: &Point2, p1: &Point2, radius: f64) -> Option<Point2> {
    let chord = p1 - p0;
    let chord_sq = chord.norm_squared();
    if chord_sq < 1e-24 || 4.0 * radius * radius < chord_sq * (1.0 - 1e-12) {
        return None;
    }

    let half = 0.5 * chord_sq.sqrt();
    let offset = (radius * radius - half * half).max(0.0).sqrt();
    let midpoint = p0 + chord * 0.5;

    // Unit normal to the chord, oriented toward +r.
    let mut normal = Vector2::new(-chord.y, chord.x) / (2.0 * half);
    if normal.y < 0.0 {
        normal = -normal;
    }

    Some(if radius > 0.0 {
        midpoint - normal * offset
    } else {
        midpoint + normal * offset
    })
}

/// Signed radius of the arc through `p0` and `p1` around `center`.
///
/// Returns the two endpoint distances when they disagree by more than 1% of
/// the first, as `Err((first, second))`.
///
/// # Errors
///
/// Returns the mismatching endpoint radii when the endpoints cannot lie on a
/// common circle around `center`.
pub fn arc_radius(p0: &Point2, p1: &Point2, center: &Point2) -> Result<f64, (f64, f64)> {
    let first = (p0 - center).norm();
    let second = (p1 - center).norm();
    if first <= 0.0 || (first - second).abs() / first > 1e-2 {
        return Err((first, second));
    }
    if center.y > p0.y || center.y > p1.y {
        Ok(-first)
    } else {
        Ok(first)
    }
}

/// Radius `r` of the arc at height `z`; `z` outside the circle clamps to the
/// arc's extreme.
#[must_use]
pub fn arc_r_at(center: &Point2, radius: f64, z: f64) -> f64 {
    let dz = z - center.x;
    let root = (radius * radius - dz * dz).max(0.0).sqrt();
    if radius >= 0.0 {
        center.y + root
    } else {
        center.y - root
    }
}

/// Heights `z` where the arc passes through radius `r`, if any.
#[must_use]
pub fn arc_z_at(center: &Point2, radius: f64, r: f64) -> Option<(f64, f64)> {
    let dr = r - center.y;
    if (radius >= 0.0 && dr < 0.0) || (radius < 0.0 && dr > 0.0) {
        return None;
    }
    let h = radius * radius - dr * dr;
    if h < 0.0 {
        return None;
    }
    let root = h.sqrt();
    Some((center.x - root, center.x + root))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn center_of_rounded_corner() {
        // Quarter arc from (-1, 0.5) up to (-0.5, 1): center at (-0.5, 0.5).
        let c = arc_center(&Point2::new(-1.0, 0.5), &Point2::new(-0.5, 1.0), 0.5).unwrap();
        assert!((c.x + 0.5).abs() < TOL, "c={c}");
        assert!((c.y - 0.5).abs() < TOL, "c={c}");
    }

    #[test]
    fn center_of_semicircle() {
        let c = arc_center(&Point2::new(-1.0, 0.0), &Point2::new(1.0, 0.0), 1.0).unwrap();
        assert!(c.coords.norm() < 1e-6, "c={c}");
    }

    #[test]
    fn negative_radius_puts_center_above() {
        let c = arc_center(&Point2::new(-1.0, 2.0), &Point2::new(-0.5, 1.5), -0.5).unwrap();
        assert!((c.x + 0.5).abs() < TOL, "c={c}");
        assert!((c.y - 2.0).abs() < TOL, "c={c}");
    }

    #[test]
    fn radius_smaller_than_half_chord_has_no_center() {
        assert!(arc_center(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), 0.9).is_none());
    }

    #[test]
    fn radius_from_center_sign() {
        let r = arc_radius(&Point2::new(-1.0, 0.5), &Point2::new(-0.5, 1.0), &Point2::new(-0.5, 0.5));
        assert!((r.unwrap() - 0.5).abs() < TOL);

        let r = arc_radius(&Point2::new(-1.0, 2.0), &Point2::new(-0.5, 1.5), &Point2::new(-0.5, 2.0));
        assert!((r.unwrap() + 0.5).abs() < TOL);
    }

    #[test]
    fn radius_from_center_rejects_mismatch() {
        let r = arc_radius(&Point2::new(0.0, 1.0), &Point2::new(3.0, 0.0), &Point2::origin());
        assert!(r.is_err());
    }

    #[test]
    fn evaluate_and_invert() {
        let c = Point2::new(0.0, 1.0);
        assert!((arc_r_at(&c, 2.0, 0.0) - 3.0).abs() < TOL);
        assert!((arc_r_at(&c, -2.0, 0.0) + 1.0).abs() < TOL);
        let (z0, z1) = arc_z_at(&c, 2.0, 1.0 + 3.0_f64.sqrt()).unwrap();
        assert!((z0 + 1.0).abs() < 1e-9 && (z1 - 1.0).abs() < 1e-9);
        assert!(arc_z_at(&c, 2.0, 0.5).is_none());
    }
}
