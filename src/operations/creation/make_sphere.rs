use crate::error::Result;
use crate::geometry::solid::{Primitive, Sphere};
use crate::geometry::{ConductorAttrs, Frame, Orientation, Shape};
use crate::math::Vector3;

use super::positive;

/// Creates a sphere, or a spheroid when an ellipticity is set.
pub struct MakeSphere {
    radius: f64,
    ellipticity: f64,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeSphere {
    /// Creates a new `MakeSphere` operation.
    #[must_use]
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            ellipticity: 1.0,
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Ratio of the y half axis to the x and z half axes.
    #[must_use]
    pub fn ellipticity(mut self, ellipticity: f64) -> Self {
        self.ellipticity = ellipticity;
        self
    }

    /// Builds the shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or ellipticity is not positive.
    pub fn execute(self) -> Result<Shape> {
        let radius = positive("radius", self.radius)?;
        let frame = Frame::new(self.center, Orientation::Z, self.ellipticity)?;
        Ok(Shape::primitive(
            Primitive::Sphere(Sphere::new(radius)?),
            frame,
            self.attrs,
        ))
    }
}

conductor_setters!(MakeSphere);
