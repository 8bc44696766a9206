//! Builders for conductor shapes.
//!
//! Each builder takes the primitive's own parameters in `new`, the shared
//! conductor attributes through chained setters, and validates everything in
//! `execute`.

use crate::error::{GeometryError, Result};
use crate::geometry::{Orientation, Shape};
use crate::math::LARGE_POS;

/// Adds the conductor attribute setters to a builder with `attrs` and
/// `center` fields.
macro_rules! conductor_setters {
    ($builder:ty) => {
        impl $builder {
            /// Sets the voltage (a value, [`crate::geometry::Voltage`] or time function).
            #[must_use]
            pub fn voltage(mut self, voltage: impl Into<crate::geometry::Voltage>) -> Self {
                self.attrs.voltage = voltage.into();
                self
            }

            /// Sets the center offset.
            #[must_use]
            pub fn center(mut self, x: f64, y: f64, z: f64) -> Self {
                self.center = crate::math::Vector3::new(x, y, z);
                self
            }

            /// Sets the conductor id.
            #[must_use]
            pub fn condid(mut self, condid: i32) -> Self {
                self.attrs.condid = condid;
                self
            }

            /// Takes a fresh conductor id from the process-wide counter.
            #[must_use]
            pub fn next_condid(mut self) -> Self {
                self.attrs.condid = crate::geometry::next_condid();
                self
            }

            /// Sets the material tag.
            #[must_use]
            pub fn material(mut self, material: impl Into<String>) -> Self {
                self.attrs.material = material.into();
                self
            }

            /// Sets the name.
            #[must_use]
            pub fn name(mut self, name: impl Into<String>) -> Self {
                self.attrs.name = Some(name.into());
                self
            }

            /// Marks the surface as a Neumann boundary.
            #[must_use]
            pub fn neumann(mut self, neumann: bool) -> Self {
                self.attrs.neumann = neumann;
                self
            }

            /// Replaces all conductor attributes at once.
            #[must_use]
            pub fn attrs(mut self, attrs: crate::geometry::ConductorAttrs) -> Self {
                self.attrs = attrs;
                self
            }
        }
    };
}

mod make_annulus;
mod make_box;
mod make_cone;
mod make_cones;
mod make_cylinder;
mod make_cylinders;
mod make_plane;
mod make_quadrupole;
mod make_revolution;
mod make_sphere;
mod make_torus;

pub use make_annulus::MakeAnnulus;
pub use make_box::MakeBox;
pub use make_cone::MakeCone;
pub use make_cones::MakeCones;
pub use make_cylinder::MakeCylinder;
pub use make_cylinders::MakeCylinders;
pub use make_plane::MakePlane;
pub use make_quadrupole::MakeQuadrupole;
pub use make_revolution::MakeRevolution;
pub use make_sphere::MakeSphere;
pub use make_torus::MakeTorus;

/// Checks that a size parameter is finite and strictly positive.
pub(crate) fn positive(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter,
            value,
            min: 0.0,
            max: f64::INFINITY,
        }
        .into())
    }
}

/// Checks that a radius is finite and not negative.
pub(crate) fn non_negative(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter,
            value,
            min: 0.0,
            max: f64::INFINITY,
        }
        .into())
    }
}

/// Axial range of a length centered on the origin; an infinite length spans
/// the whole axis.
pub(crate) fn axial_range(length: f64) -> Result<(f64, f64)> {
    if length == f64::INFINITY {
        return Ok((-LARGE_POS, LARGE_POS));
    }
    let half = 0.5 * positive("length", length)?;
    Ok((-half, half))
}

/// Number of parts described by per-part tables. Every table holds either
/// one value (shared by all parts) or one value per part.
pub(crate) fn part_count(tables: &[(&'static str, usize)]) -> Result<usize> {
    let parts = tables.iter().map(|&(_, len)| len).max().unwrap_or(0);
    for &(table, found) in tables {
        if found != 1 && found != parts {
            return Err(GeometryError::TableLength {
                table,
                found,
                expected: parts,
            }
            .into());
        }
    }
    Ok(parts)
}

/// Entry `i` of a table checked by [`part_count`].
pub(crate) fn nth<T: Copy>(table: &[T], i: usize) -> T {
    if table.len() == 1 {
        table[0]
    } else {
        table[i]
    }
}

/// Axis of a part tilted by `(theta, phi)`; untilted parts stay on `z`.
pub(crate) fn tilt_orientation(theta: f64, phi: f64) -> Orientation {
    if theta == 0.0 && phi == 0.0 {
        Orientation::Z
    } else {
        Orientation::Tilted { theta, phi }
    }
}

/// Union of all parts, left to right.
pub(crate) fn union_of(parts: Vec<Shape>, what: &str) -> Result<Shape> {
    parts
        .into_iter()
        .reduce(Shape::or)
        .ok_or_else(|| GeometryError::Degenerate(format!("{what} has no parts")).into())
}
