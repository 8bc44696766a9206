use crate::error::Result;
use crate::geometry::{ConductorAttrs, Shape, Voltage};
use crate::math::Vector3;

use super::{union_of, MakeAnnulus, MakeCylinder};

/// End plates of a quadrupole.
#[derive(Debug, Clone, Copy)]
struct Plates {
    aperture: f64,
    width: f64,
    outer_radius: Option<f64>,
}

/// Creates an electric quadrupole: four rods parallel to `z` and
/// optional end plates.
///
/// The rods on the x axis are held at `vx` and the rods on the y axis at
/// `vy`. The two rod pairs are shifted along `z` by `gap_length *
/// gap_sign / 2` in opposite directions, and each end plate takes the
/// voltage of the rod pair whose ends it faces.
pub struct MakeQuadrupole {
    aperture: f64,
    rod_radius: f64,
    rod_length: f64,
    gap_length: f64,
    gap_sign: f64,
    vx: f64,
    vy: f64,
    plates: Option<Plates>,
    split_rod_ids: bool,
    center: Vector3,
    attrs: ConductorAttrs,
}

impl MakeQuadrupole {
    /// Creates a new `MakeQuadrupole` operation with rods of `rod_radius`
    /// whose inner surfaces are `aperture` from the axis.
    #[must_use]
    pub fn new(aperture: f64, rod_radius: f64, rod_length: f64) -> Self {
        Self {
            aperture,
            rod_radius,
            rod_length,
            gap_length: 0.0,
            gap_sign: 1.0,
            vx: 0.0,
            vy: 0.0,
            plates: None,
            split_rod_ids: false,
            center: Vector3::zeros(),
            attrs: ConductorAttrs::default(),
        }
    }

    /// Voltages of the x and y rod pairs.
    #[must_use]
    pub fn voltages(mut self, vx: f64, vy: f64) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    /// Gap between the rod ends and the plates. A negative `sign` shifts
    /// the x rods toward `+z` instead of `-z`.
    #[must_use]
    pub fn gap(mut self, length: f64, sign: f64) -> Self {
        self.gap_length = length;
        self.gap_sign = sign;
        self
    }

    /// Adds end plates of `width` with a hole of radius `aperture` (the rod
    /// aperture when zero). Without an outer radius a plate fills the whole
    /// transverse plane outside its hole.
    #[must_use]
    pub fn plates(mut self, aperture: f64, width: f64, outer_radius: Option<f64>) -> Self {
        self.plates = Some(Plates {
            aperture,
            width,
            outer_radius,
        });
        self
    }

    /// Gives the y rods and one plate the negated conductor id so the two
    /// electrodes can be told apart.
    #[must_use]
    pub fn split_rod_ids(mut self, split: bool) -> Self {
        self.split_rod_ids = split;
        self
    }

    #[must_use]
    pub fn center(mut self, x: f64, y: f64, z: f64) -> Self {
        self.center = Vector3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn condid(mut self, condid: i32) -> Self {
        self.attrs.condid = condid;
        self
    }

    #[must_use]
    pub fn material(mut self, material: impl Into<String>) -> Self {
        self.attrs.material = material.into();
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.attrs.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn neumann(mut self, neumann: bool) -> Self {
        self.attrs.neumann = neumann;
        self
    }

    fn part(&self, voltage: f64, condid: i32) -> ConductorAttrs {
        ConductorAttrs {
            voltage: Voltage::from(voltage),
            condid,
            ..self.attrs.clone()
        }
    }

    /// Builds the shape.
    ///
    /// # Errors
    ///
    /// Returns an error if neither rods nor plates are present, or a part
    /// has invalid dimensions.
    pub fn execute(self) -> Result<Shape> {
        let c = self.center;
        let id = self.attrs.condid;
        let y_id = if self.split_rod_ids { -id } else { id };
        let mut parts = Vec::new();

        let (ap, rr, rl) = (self.aperture, self.rod_radius, self.rod_length);
        if ap > 0.0 && rr > 0.0 && rl > 0.0 {
            let offset = ap + rr;
            let dz = 0.5 * self.gap_sign * self.gap_length;
            let rods = [
                (offset, 0.0, -dz, self.part(self.vx, id)),
                (-offset, 0.0, -dz, self.part(self.vx, id)),
                (0.0, offset, dz, self.part(self.vy, y_id)),
                (0.0, -offset, dz, self.part(self.vy, y_id)),
            ];
            for (x, y, z, attrs) in rods {
                parts.push(
                    MakeCylinder::new(rr, rl)
                        .attrs(attrs)
                        .center(c.x + x, c.y + y, c.z + z)
                        .execute()?,
                );
            }
        }

        if let Some(plates) = self.plates {
            let hole = if plates.aperture > 0.0 { plates.aperture } else { ap };
            if plates.width > 0.0 && hole > 0.0 {
                let (v1, v2, sign) = if self.gap_sign > 0.0 {
                    (self.vx, self.vy, 1)
                } else {
                    (self.vy, self.vx, -1)
                };
                let (id1, id2) = if self.split_rod_ids { (sign * id, -sign * id) } else { (id, id) };
                let dz = 0.5 * (rl + self.gap_length) + 0.5 * plates.width;
                for (z, attrs) in [(-dz, self.part(v1, id1)), (dz, self.part(v2, id2))] {
                    let plate = match plates.outer_radius {
                        Some(outer) => MakeAnnulus::new(hole, outer, plates.width)
                            .attrs(attrs)
                            .center(c.x, c.y, c.z + z)
                            .execute()?,
                        None => MakeCylinder::new(hole, plates.width)
                            .outside()
                            .attrs(attrs)
                            .center(c.x, c.y, c.z + z)
                            .execute()?,
                    };
                    parts.push(plate);
                }
            }
        }

        union_of(parts, "quadrupole")
    }
}
