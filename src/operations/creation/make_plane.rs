use crate::error::Result;
use crate::geometry::solid::{Plane, Primitive};
use crate::geometry::{ConductorAttrs, Frame, Orientation, Shape};
use crate::math::Vector3;

/// Creates the half space on one side of a plane.
///
/// Untilted, the plane is `z = z0` and the conductor lies on the `zsign`
/// side. A tilt rotates the plane normal by `theta` in the z-x plane and
/// `phi` toward y, about the center.
pub struct MakePlane {
    z0: f64,
    zsign: f64,
    theta: f64,
    phi: f64,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakePlane {
    /// Creates a new `MakePlane` operation.
    #[must_use]
    pub fn new(z0: f64, zsign: f64) -> Self {
        Self {
            z0,
            zsign,
            theta: 0.0,
            phi: 0.0,
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Tilts the plane normal.
    #[must_use]
    pub fn tilt(mut self, theta: f64, phi: f64) -> Self {
        self.theta = theta;
        self.phi = phi;
        self
    }

    /// Builds the shape.
    ///
    /// # Errors
    ///
    /// Returns an error if `zsign` is zero.
    pub fn execute(self) -> Result<Shape> {
        let orientation = if self.theta == 0.0 && self.phi == 0.0 {
            Orientation::Z
        } else {
            Orientation::Tilted {
                theta: self.theta,
                phi: self.phi,
            }
        };
        let frame = Frame::new(self.center, orientation, 1.0)?;
        let plane = Plane::new(self.z0, self.zsign)?;
        Ok(Shape::primitive(Primitive::Plane(plane), frame, self.attrs))
    }
}

conductor_setters!(MakePlane);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn plane_half_space() {
        let p = MakePlane::new(1.0, -1.0).execute().unwrap();
        assert!(p.is_inside(&Point3::new(5.0, 5.0, 0.0), 0.0).is_some());
        assert!(p.is_inside(&Point3::new(0.0, 0.0, 2.0), 0.0).is_none());
        let d = p.grid_distance([0, 0, 0], &Point3::new(0.0, 0.0, 0.25), 0.0);
        assert!((d.dels[5] + 0.75).abs() < 1e-12);
        assert!(d.dels[4] <= -crate::math::LARGE_POS * 0.5);
    }

    #[test]
    fn tilted_plane_faces_x() {
        let p = MakePlane::new(0.0, 1.0).tilt(FRAC_PI_2, 0.0).execute().unwrap();
        assert!(p.is_inside(&Point3::new(1.0, 0.0, 0.0), 0.0).is_some());
        assert!(p.is_inside(&Point3::new(-1.0, 0.0, 0.0), 0.0).is_none());
    }
}
