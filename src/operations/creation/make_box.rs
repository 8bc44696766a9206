use crate::error::Result;
use crate::geometry::solid::{Cuboid, Primitive};
use crate::geometry::{ConductorAttrs, Frame, Orientation, Shape};
use crate::math::Vector3;

use super::positive;

/// Creates an axis-aligned box from its side lengths.
pub struct MakeBox {
    xsize: f64,
    ysize: f64,
    zsize: f64,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(xsize: f64, ysize: f64, zsize: f64) -> Self {
        Self {
            xsize,
            ysize,
            zsize,
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Builds the shape.
    ///
    /// # Errors
    ///
    /// Returns an error if any side length is not positive.
    pub fn execute(self) -> Result<Shape> {
        let cuboid = Cuboid::new(
            positive("xsize", self.xsize)?,
            positive("ysize", self.ysize)?,
            positive("zsize", self.zsize)?,
        )?;
        let frame = Frame::new(self.center, Orientation::Z, 1.0)?;
        Ok(Shape::primitive(Primitive::Cuboid(cuboid), frame, self.attrs))
    }
}

conductor_setters!(MakeBox);
