use crate::error::{GeometryError, Result};
use crate::geometry::solid::{Primitive, Profile, RadialBound, Revolved, SegmentSpec};
use crate::geometry::{ConductorAttrs, Frame, Orientation, Shape};
use crate::math::Vector3;

use super::positive;

/// Creates a torus around the `z` axis.
pub struct MakeTorus {
    major_radius: f64,
    minor_radius: f64,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeTorus {
    /// Creates a new `MakeTorus` operation from the toroidal (`major_radius`)
    /// and poloidal (`minor_radius`) radii.
    #[must_use]
    pub fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Builds the shape.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < minor_radius <= major_radius`.
    pub fn execute(self) -> Result<Shape> {
        let r1 = positive("major radius", self.major_radius)?;
        let r2 = positive("minor radius", self.minor_radius)?;
        if r2 > r1 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "minor radius",
                value: r2,
                min: 0.0,
                max: r1,
            }
            .into());
        }
        let z = [-r2, r2];
        let r = [r1, r1];
        let inner = Profile::new(&z, &r, &[SegmentSpec::Radius(-r2)])?;
        let outer = Profile::new(&z, &r, &[SegmentSpec::Radius(r2)])?;
        let solid = Revolved::new(
            -r2,
            r2,
            RadialBound::Profile(inner),
            RadialBound::Profile(outer),
        )?;
        let frame = Frame::new(self.center, Orientation::Z, 1.0)?;
        Ok(Shape::primitive(Primitive::Revolved(solid), frame, self.attrs))
    }
}

conductor_setters!(MakeTorus);
