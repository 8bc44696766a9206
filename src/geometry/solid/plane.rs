use crate::error::{GeometryError, Result};
use crate::geometry::Extent;
use crate::math::span::Spans;
use crate::math::{Point3, Vector3, LARGE_POS};

use super::Solid;

/// Half space bounded by the plane `z = z0` of the local frame.
///
/// The conductor fills the side `zsign * (z - z0) >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    z0: f64,
    zsign: f64,
}

impl Plane {
    /// Creates a half space.
    ///
    /// # Errors
    ///
    /// Returns an error if `zsign` is zero or not finite.
    pub fn new(z0: f64, zsign: f64) -> Result<Self> {
        if zsign == 0.0 || !zsign.is_finite() {
            return Err(GeometryError::Degenerate("plane side must be nonzero".into()).into());
        }
        Ok(Self {
            z0,
            zsign: zsign.signum(),
        })
    }

    /// Location of the plane along local z.
    #[must_use]
    pub fn z0(&self) -> f64 {
        self.z0
    }

    /// `+1` when the conductor lies above the plane, `-1` below.
    #[must_use]
    pub fn zsign(&self) -> f64 {
        self.zsign
    }
}

impl Solid for Plane {
    fn contains(&self, p: &Point3) -> bool {
        self.zsign * (p.z - self.z0) >= 0.0
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        -self.zsign * (p.z - self.z0)
    }

    fn line_spans(&self, origin: &Point3, dir: &Vector3) -> Spans {
        if dir.z.abs() < 1e-14 * dir.norm() {
            return if self.contains(origin) {
                Spans::full()
            } else {
                Spans::empty()
            };
        }
        let t0 = (self.z0 - origin.z) / dir.z;
        if self.zsign * dir.z > 0.0 {
            Spans::single(t0, f64::INFINITY)
        } else {
            Spans::single(f64::NEG_INFINITY, t0)
        }
    }

    fn extent(&self) -> Extent {
        let (zlo, zhi) = if self.zsign > 0.0 {
            (self.z0, LARGE_POS)
        } else {
            (-LARGE_POS, self.z0)
        };
        Extent::new(
            Point3::new(-LARGE_POS, -LARGE_POS, zlo),
            Point3::new(LARGE_POS, LARGE_POS, zhi),
        )
    }

    fn normal(&self, _p: &Point3) -> Vector3 {
        Vector3::new(0.0, 0.0, -self.zsign)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn conductor_above_plane() {
        let p = Plane::new(1.0, 1.0).unwrap();
        assert!(p.contains(&Point3::new(0.0, 0.0, 2.0)));
        assert!(!p.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!((p.signed_distance(&Point3::new(5.0, 5.0, 3.0)) + 2.0).abs() < 1e-15);
    }

    #[test]
    fn spans_along_z() {
        let p = Plane::new(1.0, -1.0).unwrap();
        let s = p.line_spans(&Point3::origin(), &Vector3::z());
        assert_eq!(s.intervals(), &[(f64::NEG_INFINITY, 1.0)]);
        let s = p.line_spans(&Point3::origin(), &Vector3::x());
        assert_eq!(s, Spans::full());
    }

    #[test]
    fn zero_side_is_rejected() {
        assert!(Plane::new(0.0, 0.0).is_err());
    }
}
