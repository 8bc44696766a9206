use nalgebra::Matrix3;

use crate::error::{GeometryError, Result};
use crate::math::{is_unbounded, Point3, Rotation3, Vector3, TOLERANCE};

use super::Extent;

/// Direction of a primitive's symmetry axis in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    /// Local axes coincide with world axes.
    Z,
    /// Local z runs along world x (local x is world y, local y is world z).
    X,
    /// Local z runs along world y (local x is world z, local y is world x).
    Y,
    /// Local z tilted by `theta` in the z-x plane and `phi` toward y.
    Tilted { theta: f64, phi: f64 },
}

/// Placement of a primitive: center offset, orientation and ellipticity.
///
/// Queries map world points into the canonical z-aligned local frame, where
/// the local `y` coordinate is additionally divided by the ellipticity.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    center: Vector3,
    orientation: Orientation,
    rotation: Rotation3,
    ellipticity: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            center: Vector3::zeros(),
            orientation: Orientation::Z,
            rotation: Rotation3::identity(),
            ellipticity: 1.0,
        }
    }
}

impl Frame {
    /// Creates a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the ellipticity is not strictly positive.
    pub fn new(center: Vector3, orientation: Orientation, ellipticity: f64) -> Result<Self> {
        if !(ellipticity > TOLERANCE) || !ellipticity.is_finite() {
            return Err(GeometryError::Degenerate("ellipticity must be positive".into()).into());
        }
        let rotation = match orientation {
            Orientation::Tilted { theta, phi } => tilt_rotation(theta, phi),
            _ => Rotation3::identity(),
        };
        Ok(Self {
            center,
            orientation,
            rotation,
            ellipticity,
        })
    }

    /// Center offset.
    #[must_use]
    pub fn center(&self) -> &Vector3 {
        &self.center
    }

    /// Axis orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Ratio of the y to x half axes.
    #[must_use]
    pub fn ellipticity(&self) -> f64 {
        self.ellipticity
    }

    /// Maps a world point into the local frame.
    #[must_use]
    pub fn to_local_point(&self, p: &Point3) -> Point3 {
        Point3::from(self.to_local_vector(&(p.coords - self.center)))
    }

    /// Maps a world displacement into the local frame; lengths along a line
    /// keep their parameterisation.
    #[must_use]
    pub fn to_local_vector(&self, v: &Vector3) -> Vector3 {
        let mut l = self.unrotate(v);
        l.y /= self.ellipticity;
        l
    }

    /// Maps a local point back into world coordinates.
    #[must_use]
    pub fn to_world_point(&self, l: &Point3) -> Point3 {
        let scaled = Vector3::new(l.x, l.y * self.ellipticity, l.z);
        Point3::from(self.rotate(&scaled) + self.center)
    }

    /// Maps a local surface normal to a unit world normal.
    #[must_use]
    pub fn normal_to_world(&self, n: &Vector3) -> Vector3 {
        let scaled = Vector3::new(n.x, n.y / self.ellipticity, n.z);
        let w = self.rotate(&scaled);
        let len = w.norm();
        if len > 0.0 {
            w / len
        } else {
            w
        }
    }

    /// World extent of a local extent.
    #[must_use]
    pub fn extent_to_world(&self, local: &Extent) -> Extent {
        let e = self.ellipticity;
        let scale = |v: f64| if is_unbounded(v) { v } else { v * e };
        let local = Extent::new(
            Point3::new(local.min.x, scale(local.min.y), local.min.z),
            Point3::new(local.max.x, scale(local.max.y), local.max.z),
        );

        let world = match self.orientation {
            Orientation::Z => local,
            Orientation::X => Extent::new(
                Point3::new(local.min.z, local.min.x, local.min.y),
                Point3::new(local.max.z, local.max.x, local.max.y),
            ),
            Orientation::Y => Extent::new(
                Point3::new(local.min.y, local.min.z, local.min.x),
                Point3::new(local.max.y, local.max.z, local.max.x),
            ),
            Orientation::Tilted { .. } => {
                let unbounded = (0..3).any(|k| is_unbounded(local.min[k]) || is_unbounded(local.max[k]));
                if unbounded {
                    Extent::unbounded()
                } else {
                    let corners = local.corners().map(|c| Point3::from(self.rotation * c.coords));
                    Extent::from_points(&corners)
                }
            }
        };
        world.translated(&self.center)
    }

    fn unrotate(&self, v: &Vector3) -> Vector3 {
        match self.orientation {
            Orientation::Z => *v,
            Orientation::X => Vector3::new(v.y, v.z, v.x),
            Orientation::Y => Vector3::new(v.z, v.x, v.y),
            Orientation::Tilted { .. } => self.rotation.inverse() * v,
        }
    }

    fn rotate(&self, l: &Vector3) -> Vector3 {
        match self.orientation {
            Orientation::Z => *l,
            Orientation::X => Vector3::new(l.z, l.x, l.y),
            Orientation::Y => Vector3::new(l.y, l.z, l.x),
            Orientation::Tilted { .. } => self.rotation * l,
        }
    }
}

/// Rotation taking the local z axis to `(sin t cos p, sin p, cos t cos p)`.
fn tilt_rotation(theta: f64, phi: f64) -> Rotation3 {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    let ex = Vector3::new(ct, 0.0, -st);
    let ey = Vector3::new(-st * sp, cp, -ct * sp);
    let ez = Vector3::new(st * cp, sp, ct * cp);
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[ex, ey, ez]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-12;

    #[test]
    fn x_orientation_permutes_axes() {
        let f = Frame::new(Vector3::new(1.0, 0.0, 0.0), Orientation::X, 1.0).unwrap();
        let l = f.to_local_point(&Point3::new(3.0, 4.0, 5.0));
        assert!((l - Point3::new(4.0, 5.0, 2.0)).norm() < TOL);
        let back = f.to_world_point(&l);
        assert!((back - Point3::new(3.0, 4.0, 5.0)).norm() < TOL);
    }

    #[test]
    fn y_orientation_round_trip() {
        let f = Frame::new(Vector3::zeros(), Orientation::Y, 2.0).unwrap();
        let p = Point3::new(1.0, -2.0, 3.0);
        assert!((f.to_world_point(&f.to_local_point(&p)) - p).norm() < TOL);
        // Local z runs along world y.
        let l = f.to_local_vector(&Vector3::new(0.0, 1.0, 0.0));
        assert!((l - Vector3::new(0.0, 0.0, 1.0)).norm() < TOL);
    }

    #[test]
    fn tilt_maps_local_axis() {
        let f = Frame::new(
            Vector3::zeros(),
            Orientation::Tilted {
                theta: FRAC_PI_2,
                phi: 0.0,
            },
            1.0,
        )
        .unwrap();
        // theta = pi/2 lays the axis along +x.
        let l = f.to_local_vector(&Vector3::new(1.0, 0.0, 0.0));
        assert!((l - Vector3::new(0.0, 0.0, 1.0)).norm() < TOL);
        let p = Point3::new(0.3, -0.7, 1.1);
        assert!((f.to_world_point(&f.to_local_point(&p)) - p).norm() < TOL);
    }

    #[test]
    fn ellipticity_scales_local_y() {
        let f = Frame::new(Vector3::zeros(), Orientation::Z, 2.0).unwrap();
        let l = f.to_local_point(&Point3::new(0.0, 4.0, 0.0));
        assert!((l.y - 2.0).abs() < TOL);
        let n = f.normal_to_world(&Vector3::new(0.0, 1.0, 0.0));
        assert!((n - Vector3::new(0.0, 1.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn extents_follow_orientation() {
        let local = Extent::new(Point3::new(-1.0, -1.0, -3.0), Point3::new(1.0, 1.0, 3.0));
        let f = Frame::new(Vector3::new(0.0, 0.0, 10.0), Orientation::X, 1.0).unwrap();
        let w = f.extent_to_world(&local);
        assert_eq!(w.min, Point3::new(-3.0, -1.0, 9.0));
        assert_eq!(w.max, Point3::new(3.0, 1.0, 11.0));
    }

    #[test]
    fn rejects_non_positive_ellipticity() {
        assert!(Frame::new(Vector3::zeros(), Orientation::Z, 0.0).is_err());
    }
}
