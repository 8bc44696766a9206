use crate::error::Result;
use crate::geometry::{ConductorAttrs, Shape};
use crate::math::Vector3;

use super::{nth, part_count, tilt_orientation, union_of, MakeCone};

/// Creates a union of truncated cones from per-part tables.
///
/// Tables follow the same one-or-per-part rule as
/// [`MakeCylinders`](super::MakeCylinders).
pub struct MakeCones {
    r_zmin: Vec<f64>,
    r_zmax: Vec<f64>,
    length: Vec<f64>,
    theta: Vec<f64>,
    phi: Vec<f64>,
    centers: Vec<Vector3>,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeCones {
    /// Creates a new `MakeCones` operation.
    #[must_use]
    pub fn new(r_zmin: Vec<f64>, r_zmax: Vec<f64>, length: Vec<f64>) -> Self {
        Self {
            r_zmin,
            r_zmax,
            length,
            theta: vec![0.0],
            phi: vec![0.0],
            centers: vec![Vector3::zeros()],
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    #[must_use]
    pub fn tilts(mut self, tilts: &[(f64, f64)]) -> Self {
        self.theta = tilts.iter().map(|t| t.0).collect();
        self.phi = tilts.iter().map(|t| t.1).collect();
        self
    }

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
            ("r_zmin", self.r_zmin.len()),
            ("r_zmax", self.r_zmax.len()),
            ("length", self.length.len()),
            ("tilts", self.theta.len()),
            ("centers", self.centers.len()),
        ])?;
        let shapes = (0..parts)
            .map(|i| {
                let c = self.center + nth(&self.centers, i);
                MakeCone::new(nth(&self.r_zmin, i), nth(&self.r_zmax, i), nth(&self.length, i))
                    .orientation(tilt_orientation(nth(&self.theta, i), nth(&self.phi, i)))
                    .attrs(self.attrs.clone())
                    .center(c.x, c.y, c.z)
                    .execute()
            })
            .collect::<Result<Vec<_>>>()?;
        union_of(shapes, "cone array")
    }
}

conductor_setters!(MakeCones);
