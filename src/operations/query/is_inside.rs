use rayon::prelude::*;

use crate::config::ConductorSettings;
use crate::geometry::Shape;
use crate::math::Point3;

/// Conductor id of the shape for each point inside it, 0 elsewhere.
pub struct IsInside<'a> {
    shape: &'a Shape,
    points: &'a [Point3],
    aura: f64,
}

impl<'a> IsInside<'a> {
    /// Creates a new `IsInside` query with no aura.
    #[must_use]
    pub fn new(shape: &'a Shape, points: &'a [Point3]) -> Self {
        Self {
            shape,
            points,
            aura: 0.0,
        }
    }

    /// Points within `aura` of the surface on the outside also count.
    #[must_use]
    pub fn aura(mut self, aura: f64) -> Self {
        self.aura = aura;
        self
    }

    /// Takes the aura from `settings`.
    #[must_use]
    pub fn settings(self, settings: &ConductorSettings) -> Self {
        self.aura(settings.aura)
    }

    #[must_use]
    pub fn execute(&self) -> Vec<i32> {
        self.points
            .par_iter()
            .map(|p| self.shape.is_inside(p, self.aura).unwrap_or(0))
            .collect()
    }
}
