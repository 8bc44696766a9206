use crate::error::Result;
use crate::geometry::solid::{Primitive, RadialBound, Revolved};
use crate::geometry::{ConductorAttrs, Frame, Orientation, Shape};
use crate::math::Vector3;

/// Creates a general surface of revolution between an inner and an outer
/// radial bound over `[zmin, zmax]`.
///
/// Bounds may be constants, tabulated profiles or radius functions.
pub struct MakeRevolution {
    inner: RadialBound,
    outer: RadialBound,
    zmin: f64,
    zmax: f64,
    orientation: Orientation,
    ellipticity: f64,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeRevolution {
    /// Region between two bounds.
    #[must_use]
    pub fn between(inner: RadialBound, outer: RadialBound, zmin: f64, zmax: f64) -> Self {
        Self {
            inner,
            outer,
            zmin,
            zmax,
            orientation: Orientation::Z,
            ellipticity: 1.0,
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Region inside `surface`, from the axis outward.
    #[must_use]
    pub fn inside(surface: RadialBound, zmin: f64, zmax: f64) -> Self {
        Self::between(RadialBound::axis(), surface, zmin, zmax)
    }

    /// Region outside `surface`, unbounded in radius.
    #[must_use]
    pub fn outside(surface: RadialBound, zmin: f64, zmax: f64) -> Self {
        Self::between(surface, RadialBound::open(), zmin, zmax)
    }

    /// Replaces the inner bound.
    #[must_use]
    pub fn inner(mut self, inner: RadialBound) -> Self {
        self.inner = inner;
        self
    }

    /// Replaces the outer bound.
    #[must_use]
    pub fn outer(mut self, outer: RadialBound) -> Self {
        self.outer = outer;
        self
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
    /// Returns an error if `zmin` is not below `zmax` or the ellipticity is
    /// not positive.
    pub fn execute(self) -> Result<Shape> {
        let solid = Revolved::new(self.zmin, self.zmax, self.inner, self.outer)?;
        let frame = Frame::new(self.center, self.orientation, self.ellipticity)?;
        Ok(Shape::primitive(Primitive::Revolved(solid), frame, self.attrs))
    }
}

conductor_setters!(MakeRevolution);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::solid::{Profile, SegmentSpec};
    use crate::math::Point3;

    #[test]
    fn function_bound_inside() {
        let s = MakeRevolution::inside(RadialBound::function(|z| 1.0 + 0.5 * z), -1.0, 1.0)
            .execute()
            .unwrap();
        assert!(s.is_inside(&Point3::new(1.4, 0.0, 0.9), 0.0).is_some());
        assert!(s.is_inside(&Point3::new(1.4, 0.0, -0.9), 0.0).is_none());
    }

    #[test]
    fn tabulated_bound_outside() {
        let wall = Profile::new(&[-1.0, 0.0, 1.0], &[1.0, 1.0, 2.0], &[SegmentSpec::Straight; 2]).unwrap();
        let s = MakeRevolution::outside(RadialBound::Profile(wall), -1.0, 1.0)
            .execute()
            .unwrap();
        assert!(s.is_inside(&Point3::new(1.2, 0.0, -0.5), 0.0).is_some());
        assert!(s.is_inside(&Point3::new(1.2, 0.0, 0.5), 0.0).is_none());
    }

    #[test]
    fn y_oriented_in_out() {
        let s = MakeRevolution::between(
            RadialBound::Constant(0.5),
            RadialBound::Constant(1.0),
            0.0,
            2.0,
        )
        .orientation(Orientation::Y)
        .execute()
        .unwrap();
        assert!(s.is_inside(&Point3::new(0.75, 1.0, 0.0), 0.0).is_some());
        assert!(s.is_inside(&Point3::new(0.0, 1.0, 0.0), 0.0).is_none());
        assert!(s.is_inside(&Point3::new(0.75, -0.5, 0.0), 0.0).is_none());
    }

    #[test]
    fn empty_z_range_is_rejected() {
        assert!(MakeRevolution::inside(RadialBound::Constant(1.0), 1.0, 1.0).execute().is_err());
    }
}
