//! Primitive solids in their canonical local frame.
//!
//! Every primitive answers the same questions: closed point membership, a
//! signed distance to its surface, and the [`Spans`] where a line lies
//! inside it. Grid distances and intercepts are derived from the spans.

mod cuboid;
mod plane;
mod profile;
mod revolved;
mod sphere;

pub use cuboid::Cuboid;
pub use plane::Plane;
pub use profile::{Profile, ProfileSegment, RadialBound, RadiusFn, SegmentSpec};
pub use revolved::Revolved;
pub use sphere::Sphere;

use crate::math::span::Spans;
use crate::math::{Point3, Vector3};

use super::Extent;

/// Geometric queries of a solid in its local frame.
pub trait Solid {
    /// Returns true if `p` lies inside or on the surface.
    fn contains(&self, p: &Point3) -> bool;

    /// Distance to the nearest surface point, negative inside.
    fn signed_distance(&self, p: &Point3) -> f64;

    /// Parameter intervals where `origin + t * dir` lies inside.
    fn line_spans(&self, origin: &Point3, dir: &Vector3) -> Spans;

    /// Bounding box in the local frame.
    fn extent(&self) -> Extent;

    /// Outward unit normal near the surface point `p`.
    fn normal(&self, p: &Point3) -> Vector3 {
        let h = 1e-7 * (1.0 + p.coords.norm());
        let grad = Vector3::from_fn(|k, _| {
            let mut dp = Vector3::zeros();
            dp[k] = h;
            self.signed_distance(&(p + dp)) - self.signed_distance(&(p - dp))
        });
        let len = grad.norm();
        if len > 0.0 {
            grad / len
        } else {
            Vector3::z()
        }
    }
}

/// The primitive kinds, each with its typed parameters.
#[derive(Debug, Clone)]
pub enum Primitive {
    Plane(Plane),
    Cuboid(Cuboid),
    Sphere(Sphere),
    Revolved(Revolved),
}

impl Solid for Primitive {
    fn contains(&self, p: &Point3) -> bool {
        match self {
            Self::Plane(s) => s.contains(p),
            Self::Cuboid(s) => s.contains(p),
            Self::Sphere(s) => s.contains(p),
            Self::Revolved(s) => s.contains(p),
        }
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        match self {
            Self::Plane(s) => s.signed_distance(p),
            Self::Cuboid(s) => s.signed_distance(p),
            Self::Sphere(s) => s.signed_distance(p),
            Self::Revolved(s) => s.signed_distance(p),
        }
    }

    fn line_spans(&self, origin: &Point3, dir: &Vector3) -> Spans {
        match self {
            Self::Plane(s) => s.line_spans(origin, dir),
            Self::Cuboid(s) => s.line_spans(origin, dir),
            Self::Sphere(s) => s.line_spans(origin, dir),
            Self::Revolved(s) => s.line_spans(origin, dir),
        }
    }

    fn extent(&self) -> Extent {
        match self {
            Self::Plane(s) => s.extent(),
            Self::Cuboid(s) => s.extent(),
            Self::Sphere(s) => s.extent(),
            Self::Revolved(s) => s.extent(),
        }
    }

    fn normal(&self, p: &Point3) -> Vector3 {
        match self {
            Self::Plane(s) => s.normal(p),
            Self::Cuboid(s) => s.normal(p),
            Self::Sphere(s) => s.normal(p),
            Self::Revolved(s) => s.normal(p),
        }
    }
}
