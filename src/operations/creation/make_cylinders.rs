use crate::error::Result;
use crate::geometry::{ConductorAttrs, Shape};
use crate::math::Vector3;

use super::{nth, part_count, tilt_orientation, union_of, MakeCylinder};

/// Creates a union of cylinders from per-part tables.
///
/// Each table holds one value shared by every part or one value per part.
/// Part centers are offsets from the builder's center.
pub struct MakeCylinders {
    radius: Vec<f64>,
    length: Vec<f64>,
    theta: Vec<f64>,
    phi: Vec<f64>,
    centers: Vec<Vector3>,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeCylinders {
    /// Creates a new `MakeCylinders` operation.
    #[must_use]
    pub fn new(radius: Vec<f64>, length: Vec<f64>) -> Self {
        Self {
            radius,
            length,
            theta: vec![0.0],
            phi: vec![0.0],
            centers: vec![Vector3::zeros()],
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Per-part tilts `(theta, phi)` of the cylinder axes.
    #[must_use]
    pub fn tilts(mut self, tilts: &[(f64, f64)]) -> Self {
        self.theta = tilts.iter().map(|t| t.0).collect();
        self.phi = tilts.iter().map(|t| t.1).collect();
        self
    }

    /// Per-part centers.
    #[must_use]
    pub fn centers(mut self, centers: Vec<Vector3>) -> Self {
        self.centers = centers;
        self
    }

    /// Builds the union.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables disagree in length, are all empty, or
    /// a part has invalid dimensions.
    pub fn execute(self) -> Result<Shape> {
        let parts = part_count(&[
            ("radius", self.radius.len()),
            ("length", self.length.len()),
            ("tilts", self.theta.len()),
            ("centers", self.centers.len()),
        ])?;
        let shapes = (0..parts)
            .map(|i| {
                let c = self.center + nth(&self.centers, i);
                MakeCylinder::new(nth(&self.radius, i), nth(&self.length, i))
                    .orientation(tilt_orientation(nth(&self.theta, i), nth(&self.phi, i)))
                    .attrs(self.attrs.clone())
                    .center(c.x, c.y, c.z)
                    .execute()
            })
            .collect::<Result<Vec<_>>>()?;
        union_of(shapes, "cylinder array")
    }
}

conductor_setters!(MakeCylinders);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::error::{CutcellError, GeometryError};
    use crate::math::Point3;

    fn inside(s: &Shape, x: f64, y: f64, z: f64) -> bool {
        s.is_inside(&Point3::new(x, y, z), 0.0).is_some()
    }

    #[test]
    fn shared_size_with_per_part_centers() {
        let s = MakeCylinders::new(vec![0.5], vec![2.0])
            .centers(vec![Vector3::new(-2.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)])
            .condid(6)
            .execute()
            .unwrap();
        assert_eq!(s.leaf_count(), 2);
        assert!(s.as_union().is_some());
        assert!(inside(&s, -2.0, 0.0, 0.9));
        assert!(inside(&s, 2.0, 0.0, -0.9));
        assert!(!inside(&s, 0.0, 0.0, 0.0));
        assert_eq!(s.condid(), 6);
    }

    #[test]
    fn per_part_tilts() {
        let s = MakeCylinders::new(vec![0.25], vec![2.0])
            .centers(vec![Vector3::new(-2.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)])
            .tilts(&[(0.0, 0.0), (FRAC_PI_2, 0.0)])
            .center(0.0, 0.0, 1.0)
            .execute()
            .unwrap();
        assert!(inside(&s, -2.0, 0.0, 1.9));
        assert!(!inside(&s, -1.1, 0.0, 1.0));
        assert!(inside(&s, 2.9, 0.0, 1.0));
        assert!(!inside(&s, 2.0, 0.0, 1.9));
    }

    #[test]
    fn mismatched_tables_are_rejected() {
        let err = MakeCylinders::new(vec![0.5, 0.6, 0.7], vec![1.0])
            .centers(vec![Vector3::zeros(), Vector3::x()])
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            CutcellError::Geometry(GeometryError::TableLength { table: "centers", found: 2, expected: 3 })
        ));
        assert!(MakeCylinders::new(vec![], vec![]).centers(vec![]).tilts(&[]).execute().is_err());
    }
}
