use ndarray::Array3;

use crate::error::Result;
use crate::geometry::{Extent, Shape};
use crate::math::{Point3, Vector3, LARGE_POS};

use super::grid::{Grid, LevelMesh, NodeWindow};

fn node_array<T: Clone>(mesh: &LevelMesh, fill: T) -> Array3<T> {
    let [nx, ny, nz] = mesh.cells;
    Array3::from_elem((nx + 1, ny + 1, nz + 1), fill)
}

fn for_each_node(mesh: &LevelMesh, window: &NodeWindow, mut f: impl FnMut([usize; 3], Point3)) {
    for iz in window.iz.clone() {
        for ix in window.ix.clone() {
            for iy in window.iy.clone() {
                let index = [ix, iy, iz];
                f(index, mesh.node(index));
            }
        }
    }
}

/// Signed distance from every node of one level to a shape.
///
/// Nodes more than a cell outside the shape's extent are not evaluated and
/// hold `LARGE_POS`.
#[derive(Debug, Clone)]
pub struct DistanceMap {
    level: usize,
    values: Array3<f64>,
}

impl DistanceMap {
    /// Evaluates `shape` on the nodes of `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the level is not in the grid's table.
    pub fn new(grid: &Grid, level: usize, shape: &Shape) -> Result<Self> {
        let mesh = grid.level_mesh(level)?;
        let mut values = node_array(&mesh, LARGE_POS);
        if let Some(window) = grid.window(level, shape.extent()) {
            for_each_node(&mesh, &window, |[ix, iy, iz], p| {
                values[[ix, iy, iz]] = shape.distance(&p);
            });
        }
        Ok(Self { level, values })
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Distance at node `(ix, iy, iz)`, if it exists.
    #[must_use]
    pub fn get(&self, index: [usize; 3]) -> Option<f64> {
        self.values.get(index).copied()
    }

    #[must_use]
    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }
}

/// Conductor id found at every node of one level, 0 for vacuum.
#[derive(Debug, Clone)]
pub struct InsideMap {
    level: usize,
    mesh: LevelMesh,
    values: Array3<i32>,
}

impl InsideMap {
    /// Creates an all-vacuum map for `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the level is not in the grid's table.
    pub fn new(grid: &Grid, level: usize) -> Result<Self> {
        let mesh = grid.level_mesh(level)?;
        let values = node_array(&mesh, 0);
        Ok(Self { level, mesh, values })
    }

    /// Marks the nodes within `aura` of the inside of `shape` with its
    /// conductor id. Other nodes keep their current value.
    pub fn add(&mut self, grid: &Grid, shape: &Shape, aura: f64) {
        let margin = Vector3::repeat(aura.max(0.0));
        let extent = shape.extent();
        let grown = Extent::new(extent.min - margin, extent.max + margin);
        let Some(window) = grid.window(self.level, &grown) else {
            return;
        };
        let values = &mut self.values;
        for_each_node(&self.mesh, &window, |[ix, iy, iz], p| {
            if let Some(condid) = shape.is_inside(&p, aura) {
                values[[ix, iy, iz]] = condid;
            }
        });
    }

    /// Resets every node holding `condid` to vacuum.
    ///
    /// Nodes of a conductor that was overwritten by a later one are not
    /// restored.
    pub fn remove(&mut self, condid: i32) {
        self.values.mapv_inplace(|v| if v == condid { 0 } else { v });
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Conductor id at node `(ix, iy, iz)`, if it exists.
    #[must_use]
    pub fn get(&self, index: [usize; 3]) -> Option<i32> {
        self.values.get(index).copied()
    }

    #[must_use]
    pub fn values(&self) -> &Array3<i32> {
        &self.values
    }
}
