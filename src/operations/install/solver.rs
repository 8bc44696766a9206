use tracing::debug;

use crate::error::{InstallError, Result};
use crate::geometry::{Delta, Parity};
use crate::operations::sample::{ConductorData, Grid, MgLevel};

/// A node held at a conductor's voltage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteriorPoint {
    pub index: [usize; 3],
    pub voltage: f64,
    pub condid: i32,
    pub level: usize,
}

/// A cut-cell node with its six directional distances in cell units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubgridPoint {
    pub index: [usize; 3],
    pub dels: [f64; 6],
    pub volts: [f64; 6],
    pub ids: [i32; 6],
    pub level: usize,
}

impl SubgridPoint {
    fn from_delta(delta: &Delta, sign: f64) -> Self {
        Self {
            index: delta.index,
            dels: delta.dels.map(|d| sign * d),
            volts: delta.volts,
            ids: delta.ids,
            level: delta.level,
        }
    }
}

/// Conductor arrays consumed by the field solver.
///
/// Dirichlet and Neumann cut cells share the subgrid arrays; Neumann entries
/// carry negated distances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConductors {
    pub interior: Vec<InteriorPoint>,
    pub even_subgrid: Vec<SubgridPoint>,
    pub odd_subgrid: Vec<SubgridPoint>,
    /// Coarsening table the entries were sampled with.
    pub levels: Vec<MgLevel>,
}

impl SolverConductors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry, keeping the allocations.
    pub fn clear(&mut self) {
        self.interior.clear();
        self.even_subgrid.clear();
        self.odd_subgrid.clear();
        self.levels.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interior.is_empty() && self.even_subgrid.is_empty() && self.odd_subgrid.is_empty()
    }
}

/// Appends sampled conductor data to a [`SolverConductors`].
///
/// Installing the same data twice duplicates its entries.
pub struct InstallConductors<'a> {
    grid: &'a Grid,
    data: &'a [ConductorData],
}

impl<'a> InstallConductors<'a> {
    /// Creates a new `InstallConductors` operation.
    #[must_use]
    pub fn new(grid: &'a Grid, data: &'a [ConductorData]) -> Self {
        Self { grid, data }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Allocation`] if the destination arrays cannot
    /// grow. The destination is left unchanged in that case.
    pub fn execute(&self, dest: &mut SolverConductors) -> Result<()> {
        let count = |parity| self.data.iter().map(|d| d.count(parity)).sum::<usize>();
        let (interior, even, odd) = (count(Parity::Interior), count(Parity::Even), count(Parity::Odd));

        dest.interior.try_reserve(interior).map_err(InstallError::from)?;
        dest.even_subgrid.try_reserve(even).map_err(InstallError::from)?;
        dest.odd_subgrid.try_reserve(odd).map_err(InstallError::from)?;

        for data in self.data {
            let sign = if data.neumann { -1.0 } else { 1.0 };
            for delta in &data.deltas {
                match delta.parity {
                    Parity::Interior => dest.interior.push(InteriorPoint {
                        index: delta.index,
                        voltage: delta.volts[0],
                        condid: delta.ids[0],
                        level: delta.level,
                    }),
                    Parity::Even => dest.even_subgrid.push(SubgridPoint::from_delta(delta, sign)),
                    Parity::Odd => dest.odd_subgrid.push(SubgridPoint::from_delta(delta, sign)),
                    Parity::Far => {}
                }
            }
        }

        dest.levels.clear();
        dest.levels.extend_from_slice(self.grid.levels());
        debug!(interior, even, odd, "installed conductor data");
        Ok(())
    }
}
