use crate::error::{GeometryError, Result};
use crate::geometry::solid::{Primitive, Profile, RadialBound, Revolved, SegmentSpec};
use crate::geometry::{ConductorAttrs, Frame, Orientation, Shape};
use crate::math::Vector3;

use super::{axial_range, positive};

/// Creates a cylinder along any axis, optionally elliptic, with rounded
/// ends, or filling the space outside its radius.
///
/// An infinite `length` gives a cylinder spanning the whole axis.
pub struct MakeCylinder {
    radius: f64,
    length: f64,
    orientation: Orientation,
    ellipticity: f64,
    corner_radius: Option<f64>,
    outside: bool,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeCylinder {
    /// Creates a new `MakeCylinder` operation along `z`.
    #[must_use]
    pub fn new(radius: f64, length: f64) -> Self {
        Self {
            radius,
            length,
            orientation: Orientation::Z,
            ellipticity: 1.0,
            corner_radius: None,
            outside: false,
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

    /// Tilts the axis by `theta` in the z-x plane and `phi` toward y.
    #[must_use]
    pub fn tilt(self, theta: f64, phi: f64) -> Self {
        self.orientation(Orientation::Tilted { theta, phi })
    }

    /// Ratio of the y to x semi axes of the cross-section.
    #[must_use]
    pub fn ellipticity(mut self, ellipticity: f64) -> Self {
        self.ellipticity = ellipticity;
        self
    }

    /// Rounds the end edges with the given radius.
    #[must_use]
    pub fn rounded(mut self, corner_radius: f64) -> Self {
        self.corner_radius = Some(corner_radius);
        self
    }

    /// Fills the region outside the radius instead of inside.
    #[must_use]
    pub fn outside(mut self) -> Self {
        self.outside = true;
        self
    }

    /// Builds the shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or length is not positive, or the
    /// corner radius does not fit the cylinder.
    pub fn execute(self) -> Result<Shape> {
        let radius = positive("radius", self.radius)?;
        let (zmin, zmax) = axial_range(self.length)?;

        let wall = match self.corner_radius {
            None => RadialBound::Constant(radius),
            Some(corner) => {
                let corner = positive("corner radius", corner)?;
                let limit = radius.min(0.5 * (zmax - zmin));
                if corner > limit {
                    return Err(GeometryError::ParameterOutOfRange {
                        parameter: "corner radius",
                        value: corner,
                        min: 0.0,
                        max: limit,
                    }
                    .into());
                }
                RadialBound::Profile(rounded_wall(radius, corner, zmin, zmax)?)
            }
        };
        let (inner, outer) = if self.outside {
            (wall, RadialBound::open())
        } else {
            (RadialBound::axis(), wall)
        };

        let solid = Revolved::new(zmin, zmax, inner, outer)?;
        let frame = Frame::new(self.center, self.orientation, self.ellipticity)?;
        Ok(Shape::primitive(Primitive::Revolved(solid), frame, self.attrs))
    }
}

conductor_setters!(MakeCylinder);

/// Wall radius with quarter-circle corners at both ends.
fn rounded_wall(radius: f64, corner: f64, zmin: f64, zmax: f64) -> Result<Profile> {
    let z = [zmin, zmin + corner, zmax - corner, zmax];
    let r = [radius - corner, radius, radius, radius - corner];
    Profile::new(
        &z,
        &r,
        &[
            SegmentSpec::Radius(corner),
            SegmentSpec::Straight,
            SegmentSpec::Radius(corner),
        ],
    )
}
