use crate::error::{GeometryError, Result};
use crate::geometry::solid::{Primitive, RadialBound, Revolved};
use crate::geometry::{ConductorAttrs, Frame, Orientation, Shape};
use crate::math::Vector3;

use super::{axial_range, non_negative, positive};

/// Creates an annulus: the region `rmin <= r <= rmax` over a length.
pub struct MakeAnnulus {
    rmin: f64,
    rmax: f64,
    length: f64,
    orientation: Orientation,
    ellipticity: f64,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeAnnulus {
    /// Creates a new `MakeAnnulus` operation along `z`.
    #[must_use]
    pub fn new(rmin: f64, rmax: f64, length: f64) -> Self {
        Self {
            rmin,
            rmax,
            length,
            orientation: Orientation::Z,
            ellipticity: 1.0,
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Sets the axis direction.
    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Ratio of the y to x semi axes of the cross-section.
    #[must_use]
    pub fn ellipticity(mut self, ellipticity: f64) -> Self {
        self.ellipticity = ellipticity;
        self
    }

    /// Builds the shape.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 <= rmin < rmax` and the length is positive.
    pub fn execute(self) -> Result<Shape> {
        let rmin = non_negative("rmin", self.rmin)?;
        let rmax = positive("rmax", self.rmax)?;
        if rmin >= rmax {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "rmin",
                value: rmin,
                min: 0.0,
                max: rmax,
            }
            .into());
        }
        let (zmin, zmax) = axial_range(self.length)?;
        let solid = Revolved::new(
            zmin,
            zmax,
            RadialBound::Constant(rmin),
            RadialBound::Constant(rmax),
        )?;
        let frame = Frame::new(self.center, self.orientation, self.ellipticity)?;
        Ok(Shape::primitive(Primitive::Revolved(solid), frame, self.attrs))
    }
}

conductor_setters!(MakeAnnulus);
