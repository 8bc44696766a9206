use std::f64::consts::PI;

use super::Point2;

/// Returns the minimum distance from `p` to the segment from `a` to `b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();

    if len_sq < 1e-20 {
        return (p - a).norm();
    }

    // Project onto the carrier line, clamp to the segment.
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// The arc starts at `start_angle` around `center` and sweeps by `sweep`
/// radians (negative sweeps run clockwise). Points inside the angular range
/// are at `||p - center| - radius|`; others are nearest to an endpoint.
#[must_use]
pub fn point_to_arc_dist(
    p: &Point2,
    center: &Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> f64 {
    let d = p - center;
    let angle = d.y.atan2(d.x);
    if angle_in_arc_range(angle, start_angle, sweep) {
        return (d.norm() - radius).abs();
    }

    let end_angle = start_angle + sweep;
    let e0 = center + radius * nalgebra::Vector2::new(start_angle.cos(), start_angle.sin());
    let e1 = center + radius * nalgebra::Vector2::new(end_angle.cos(), end_angle.sin());
    (p - e0).norm().min((p - e1).norm())
}

/// Checks if an angle falls within an arc's angular range.
fn angle_in_arc_range(angle: f64, start_angle: f64, sweep: f64) -> bool {
    let eps = 1e-10;
    let delta = (angle - start_angle).rem_euclid(2.0 * PI);

    if sweep >= 0.0 {
        delta <= sweep + eps || delta >= 2.0 * PI - eps
    } else {
        let delta = delta - 2.0 * PI;
        delta >= sweep - eps || delta.abs() >= 2.0 * PI - eps
    }
}
