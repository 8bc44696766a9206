use crate::error::Result;
use crate::geometry::solid::{Primitive, Profile, RadialBound, Revolved};
use crate::geometry::{ConductorAttrs, Frame, Orientation, Shape};
use crate::math::Vector3;

use super::{non_negative, positive};

/// Creates a truncated cone from its radii at both ends, or the region
/// outside such a cone within its length.
pub struct MakeCone {
    r_zmin: f64,
    r_zmax: f64,
    length: f64,
    orientation: Orientation,
    outside: bool,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeCone {
    /// Creates a new `MakeCone` operation along `z`.
    #[must_use]
    pub fn new(r_zmin: f64, r_zmax: f64, length: f64) -> Self {
        Self {
            r_zmin,
            r_zmax,
            length,
            orientation: Orientation::Z,
            outside: false,
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Cone whose surface line has the given `slope` (radius change per unit
    /// length) and crosses the axis at `intercept`, relative to the center.
    #[must_use]
    pub fn from_slope(slope: f64, intercept: f64, length: f64) -> Self {
        let half = 0.5 * length;
        Self::new(slope * (-half - intercept), slope * (half - intercept), length)
    }

    /// Sets the axis direction.
    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Tilts the axis by `theta` in the z-x plane and `phi` toward y.
    #[must_use]
    pub fn tilt(self, theta: f64, phi: f64) -> Self {
        self.orientation(Orientation::Tilted { theta, phi })
    }

    /// Fills the region outside the cone surface instead of inside.
    #[must_use]
    pub fn outside(mut self) -> Self {
        self.outside = true;
        self
    }

    /// Builds the shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not positive or a radius is negative.
    pub fn execute(self) -> Result<Shape> {
        let half = 0.5 * positive("length", self.length)?;
        let r0 = non_negative("r_zmin", self.r_zmin)?;
        let r1 = non_negative("r_zmax", self.r_zmax)?;
        let wall = RadialBound::Profile(Profile::polyline(&[-half, half], &[r0, r1])?);
        let (inner, outer) = if self.outside {
            (wall, RadialBound::open())
        } else {
            (RadialBound::axis(), wall)
        };
        let solid = Revolved::new(-half, half, inner, outer)?;
        let frame = Frame::new(self.center, self.orientation, 1.0)?;
        Ok(Shape::primitive(Primitive::Revolved(solid), frame, self.attrs))
    }
}

conductor_setters!(MakeCone);
