use std::ops::{BitAnd, BitOr, Not, Sub};

use crate::math::{Point3, Vector3, LARGE_POS};

/// An axis-aligned bounding box attached to every shape.
///
/// Combined in lock-step with shape composition: `&` intersects, `|` takes
/// the union, `-` keeps the minuend, `!` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Extent {
    /// Creates an extent from its corners.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// The whole domain, `±LARGE_POS` on every axis.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            min: Point3::new(-LARGE_POS, -LARGE_POS, -LARGE_POS),
            max: Point3::new(LARGE_POS, LARGE_POS, LARGE_POS),
        }
    }

    /// A box symmetric about the origin with the given half sizes.
    #[must_use]
    pub fn symmetric(half: Vector3) -> Self {
        Self {
            min: Point3::from(-half),
            max: Point3::from(half),
        }
    }

    /// Intersection of two extents; may be inverted (empty).
    #[must_use]
    pub fn intersection(&self, other: &Extent) -> Extent {
        Extent {
            min: self.min.sup(&other.min),
            max: self.max.inf(&other.max),
        }
    }

    /// Smallest extent containing both.
    #[must_use]
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Returns true when the extent is inverted on some axis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|k| self.min[k] > self.max[k])
    }

    /// Returns true if `p` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, p: &Point3) -> bool {
        (0..3).all(|k| self.min[k] <= p[k] && p[k] <= self.max[k])
    }

    /// Shifts the box by `offset`, leaving unbounded sides unbounded.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Extent {
        let shift = |v: f64, d: f64| if v.abs() >= LARGE_POS { v } else { v + d };
        Extent {
            min: Point3::new(
                shift(self.min.x, offset.x),
                shift(self.min.y, offset.y),
                shift(self.min.z, offset.z),
            ),
            max: Point3::new(
                shift(self.max.x, offset.x),
                shift(self.max.y, offset.y),
                shift(self.max.z, offset.z),
            ),
        }
    }

    /// The eight corners of the box.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounding extent of a set of points, clamped to `±LARGE_POS`.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Extent {
        let mut min = Point3::new(LARGE_POS, LARGE_POS, LARGE_POS);
        let mut max = Point3::new(-LARGE_POS, -LARGE_POS, -LARGE_POS);
        for p in points {
            min = min.inf(p);
            max = max.sup(p);
        }
        Extent {
            min: min.map(|v| v.max(-LARGE_POS)),
            max: max.map(|v| v.min(LARGE_POS)),
        }
    }
}

impl BitAnd for Extent {
    type Output = Extent;

    fn bitand(self, rhs: Extent) -> Extent {
        self.intersection(&rhs)
    }
}

impl BitOr for Extent {
    type Output = Extent;

    fn bitor(self, rhs: Extent) -> Extent {
        self.union(&rhs)
    }
}

impl Sub for Extent {
    type Output = Extent;

    fn sub(self, _rhs: Extent) -> Extent {
        self
    }
}

impl Not for Extent {
    type Output = Extent;

    fn not(self) -> Extent {
        Extent::unbounded()
    }
}
