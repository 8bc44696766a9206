//! Multilevel sampling of shapes on the field-solve mesh.

mod coarsening;
mod generate;
mod grid;
mod maps;

pub use coarsening::{coarsen_levels, MgLevel};
pub use generate::{ConductorData, GenerateConductors};
pub use grid::{Decomposition, Grid, LevelMesh, Mesh, NodeWindow};
pub use maps::{DistanceMap, InsideMap};
