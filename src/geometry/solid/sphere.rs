use crate::error::{GeometryError, Result};
use crate::geometry::Extent;
use crate::math::roots::quadratic_nonpositive;
use crate::math::span::Spans;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Solid;

/// Ball of the given radius around the local origin.
///
/// Ellipsoids are spheres placed in a frame with ellipticity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: f64,
}

impl Sphere {
    /// Creates a sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn new(radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("sphere radius must be positive".into()).into());
        }
        Ok(Self { radius })
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Solid for Sphere {
    fn contains(&self, p: &Point3) -> bool {
        p.coords.norm_squared() <= self.radius * self.radius
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        p.coords.norm() - self.radius
    }

    fn line_spans(&self, origin: &Point3, dir: &Vector3) -> Spans {
        let a = dir.dot(dir);
        let b = 2.0 * origin.coords.dot(dir);
        let c = origin.coords.norm_squared() - self.radius * self.radius;
        quadratic_nonpositive(a, b, c).map_or_else(Spans::empty, |(t1, t2)| Spans::single(t1, t2))
    }

    fn extent(&self) -> Extent {
        Extent::symmetric(Vector3::repeat(self.radius))
    }

    fn normal(&self, p: &Point3) -> Vector3 {
        let len = p.coords.norm();
        if len > 0.0 {
            p.coords / len
        } else {
            Vector3::z()
        }
    }
}
