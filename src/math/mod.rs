pub mod arc_2d;
pub mod distance_2d;
pub mod roots;
pub mod span;

/// 2D point type, used for meridional `(z, r)` coordinates.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3D rotation type.
pub type Rotation3 = nalgebra::Rotation3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Sentinel magnitude for "no surface in this direction" and unbounded extents.
pub const LARGE_POS: f64 = 1.0e36;

/// Distances closer than this between the two operands of a difference are
/// treated as a shared boundary.
pub const SHELL_TOLERANCE: f64 = 1e-10;

/// Window used by the Neumann fix-up pass when snapping distances onto the
/// surface or onto the next node.
pub const NEUMANN_FUZZ: f64 = 1e-13;

/// Default distance below which an intercept candidate counts as on the surface.
pub const SURFACE_FUZZ: f64 = 1e-9;

/// Clamps a value into `[-LARGE_POS, LARGE_POS]`, mapping infinities onto the sentinel.
#[must_use]
pub fn clamp_large(value: f64) -> f64 {
    value.clamp(-LARGE_POS, LARGE_POS)
}

/// Returns true if `value` is the unbounded sentinel (or beyond it).
#[must_use]
pub fn is_unbounded(value: f64) -> bool {
    value.abs() >= 0.5 * LARGE_POS
}

/// Polar and azimuthal angles `(theta, phi)` of a direction.
///
/// `theta` is measured from `+z`, `phi` from `+x` toward `+y`.
#[must_use]
pub fn direction_angles(n: &Vector3) -> (f64, f64) {
    let transverse = n.x.hypot(n.y);
    (transverse.atan2(n.z), n.y.atan2(n.x))
}
