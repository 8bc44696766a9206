//! Packing sampled conductor data into the solver's arrays.

mod registry;
mod solver;

pub use registry::{ConductorKey, ConductorRegistry};
pub use solver::{InstallConductors, InteriorPoint, SolverConductors, SubgridPoint};
