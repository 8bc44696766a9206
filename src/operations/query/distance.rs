use rayon::prelude::*;

use crate::geometry::Shape;
use crate::math::Point3;

/// Signed distance from each point to a shape, negative inside.
pub struct Distance<'a> {
    shape: &'a Shape,
    points: &'a [Point3],
}

impl<'a> Distance<'a> {
    /// Creates a new `Distance` query.
    #[must_use]
    pub fn new(shape: &'a Shape, points: &'a [Point3]) -> Self {
        Self { shape, points }
    }

    /// Executes the query, one distance per point in input order.
    #[must_use]
    pub fn execute(&self) -> Vec<f64> {
        self.points.par_iter().map(|p| self.shape.distance(p)).collect()
    }
}
