use rayon::prelude::*;

use crate::config::ConductorSettings;
use crate::error::{GeometryError, Result};
use crate::geometry::{Intercept as SurfaceHit, Shape};
use crate::math::{Point3, Vector3, SURFACE_FUZZ};

/// Surface crossing of each particle trajectory through a shape.
///
/// Each particle is given by a position and a velocity; misses come back as
/// the sentinel of [`SurfaceHit::none`].
pub struct Intercept<'a> {
    shape: &'a Shape,
    points: &'a [Point3],
    velocities: &'a [Vector3],
    fuzz: f64,
}

impl<'a> Intercept<'a> {
    /// Creates a new `Intercept` query with the default surface fuzz.
    #[must_use]
    pub fn new(shape: &'a Shape, points: &'a [Point3], velocities: &'a [Vector3]) -> Self {
        Self {
            shape,
            points,
            velocities,
            fuzz: SURFACE_FUZZ,
        }
    }

    /// Tolerance for accepting a candidate as on the combined surface.
    #[must_use]
    pub fn fuzz(mut self, fuzz: f64) -> Self {
        self.fuzz = fuzz;
        self
    }

    /// Takes the surface fuzz from `settings`.
    #[must_use]
    pub fn settings(self, settings: &ConductorSettings) -> Self {
        self.fuzz(settings.surface_fuzz)
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TableLength`] if there is not exactly one
    /// velocity per point.
    pub fn execute(&self) -> Result<Vec<SurfaceHit>> {
        if self.velocities.len() != self.points.len() {
            return Err(GeometryError::TableLength {
                table: "velocities",
                found: self.velocities.len(),
                expected: self.points.len(),
            }
            .into());
        }
        Ok(self
            .points
            .par_iter()
            .zip(self.velocities.par_iter())
            .map(|(p, v)| self.shape.intercept_with_fuzz(p, v, self.fuzz))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::error::CutcellError;
    use crate::operations::creation::MakeSphere;

    #[test]
    fn hits_and_misses_keep_order() {
        let s = MakeSphere::new(1.0).execute().unwrap();
        let points = [Point3::new(0.0, 0.0, -2.0), Point3::new(0.0, 3.0, 0.0)];
        let velocities = [Vector3::z(), Vector3::x()];
        let hits = Intercept::new(&s, &points, &velocities).execute().unwrap();
        assert!(hits[0].is_found());
        assert!((hits[0].point - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
        assert!((hits[0].theta - PI).abs() < 1e-12);
        assert!(!hits[1].is_found());
    }

    #[test]
    fn mismatched_velocities_are_rejected() {
        let s = MakeSphere::new(1.0).execute().unwrap();
        let points = [Point3::origin(), Point3::origin()];
        let err = Intercept::new(&s, &points, &[Vector3::z()]).execute().unwrap_err();
        assert!(matches!(
            err,
            CutcellError::Geometry(GeometryError::TableLength { found: 1, expected: 2, .. })
        ));
    }

    #[test]
    fn particle_inside_reports_crossing_behind() {
        let s = MakeSphere::new(1.0).center(0.0, 0.0, 5.0).execute().unwrap();
        let settings = ConductorSettings::default();
        let hits = Intercept::new(&s, &[Point3::new(0.0, 0.0, 5.5)], &[Vector3::z()])
            .settings(&settings)
            .execute()
            .unwrap();
        assert!((hits[0].point - Point3::new(0.0, 0.0, 4.0)).norm() < 1e-12);
    }
}
