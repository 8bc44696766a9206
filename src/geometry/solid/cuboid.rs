use crate::error::{GeometryError, Result};
use crate::geometry::Extent;
use crate::math::span::Spans;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Solid;

/// Axis-aligned box centered on the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    half: Vector3,
}

impl Cuboid {
    /// Creates a box from its full side lengths.
    ///
    /// # Errors
    ///
    /// Returns an error if any side length is not positive.
    pub fn new(xsize: f64, ysize: f64, zsize: f64) -> Result<Self> {
        if xsize < TOLERANCE || ysize < TOLERANCE || zsize < TOLERANCE {
            return Err(GeometryError::Degenerate("box sizes must be positive".into()).into());
        }
        Ok(Self {
            half: Vector3::new(xsize, ysize, zsize) * 0.5,
        })
    }

    /// Half side lengths.
    #[must_use]
    pub fn half_sizes(&self) -> &Vector3 {
        &self.half
    }
}

impl Solid for Cuboid {
    fn contains(&self, p: &Point3) -> bool {
        (0..3).all(|k| p[k].abs() <= self.half[k])
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        let q = p.coords.abs() - self.half;
        let outside = q.map(|v| v.max(0.0)).norm();
        let inside = q.max().min(0.0);
        outside + inside
    }

    fn line_spans(&self, origin: &Point3, dir: &Vector3) -> Spans {
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;
        for k in 0..3 {
            if dir[k] == 0.0 {
                if origin[k].abs() > self.half[k] {
                    return Spans::empty();
                }
                continue;
            }
            let t1 = (-self.half[k] - origin[k]) / dir[k];
            let t2 = (self.half[k] - origin[k]) / dir[k];
            lo = lo.max(t1.min(t2));
            hi = hi.min(t1.max(t2));
        }
        Spans::single(lo, hi)
    }

    fn extent(&self) -> Extent {
        Extent::symmetric(self.half)
    }

    fn normal(&self, p: &Point3) -> Vector3 {
        // Face whose plane is relatively closest.
        let mut best = 0;
        let mut best_ratio = f64::NEG_INFINITY;
        for k in 0..3 {
            let ratio = p[k].abs() / self.half[k];
            if ratio > best_ratio {
                best = k;
                best_ratio = ratio;
            }
        }
        let mut n = Vector3::zeros();
        n[best] = if p[best] < 0.0 { -1.0 } else { 1.0 };
        n
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_box() -> Cuboid {
        Cuboid::new(2.0, 2.0, 2.0).unwrap()
    }

    #[test]
    fn signed_distance_inside_and_out() {
        let b = unit_box();
        assert!((b.signed_distance(&Point3::origin()) + 1.0).abs() < 1e-15);
        assert!((b.signed_distance(&Point3::new(3.0, 0.0, 0.0)) - 2.0).abs() < 1e-15);
        let corner = b.signed_distance(&Point3::new(2.0, 2.0, 1.0));
        assert!((corner - 2.0_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn slab_spans() {
        let b = unit_box();
        let s = b.line_spans(&Point3::new(1.5, 0.5, 0.0), &Vector3::x());
        assert_eq!(s.intervals(), &[(-2.5, -0.5)]);
        let s = b.line_spans(&Point3::new(1.5, 0.5, 0.0), &Vector3::y());
        assert!(s.is_empty());
    }

    #[test]
    fn face_normal() {
        let n = unit_box().normal(&Point3::new(0.2, -1.0, 0.3));
        assert_eq!(n, Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn rejects_flat_box() {
        assert!(Cuboid::new(1.0, 0.0, 1.0).is_err());
    }
}
