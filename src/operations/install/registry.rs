use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, info};

use crate::config::ConductorSettings;
use crate::error::{InstallError, Result};
use crate::geometry::Shape;
use crate::operations::sample::{GenerateConductors, Grid};

use super::solver::{InstallConductors, SolverConductors};

slotmap::new_key_type! {
    /// Handle to a shape in a [`ConductorRegistry`].
    pub struct ConductorKey;
}

/// Owns the conductor shapes of a simulation and remembers which of them are
/// already in the solver arrays.
///
/// Removing a shape does not take its entries out of the solver; call
/// [`ConductorRegistry::reinstall_all`] after removals or mesh changes.
#[derive(Debug, Default)]
pub struct ConductorRegistry {
    shapes: SlotMap<ConductorKey, Shape>,
    installed: SecondaryMap<ConductorKey, ()>,
}

impl ConductorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shape for installation.
    pub fn add(&mut self, shape: Shape) -> ConductorKey {
        self.shapes.insert(shape)
    }

    /// Unregisters a shape and returns it.
    pub fn remove(&mut self, key: ConductorKey) -> Option<Shape> {
        self.installed.remove(key);
        self.shapes.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: ConductorKey) -> bool {
        self.shapes.contains_key(key)
    }

    /// Returns the shape registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::UnknownConductor`] if the key was removed or
    /// never issued by this registry.
    pub fn get(&self, key: ConductorKey) -> Result<&Shape> {
        self.shapes
            .get(key)
            .ok_or_else(|| InstallError::UnknownConductor.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConductorKey, &Shape)> {
        self.shapes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn is_installed(&self, key: ConductorKey) -> bool {
        self.installed.contains_key(key)
    }

    /// Samples and installs every shape not installed yet, returning how
    /// many were installed.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling or installing a shape fails; shapes
    /// installed before the failure stay marked.
    pub fn install_pending(
        &mut self,
        grid: &Grid,
        settings: &ConductorSettings,
        dest: &mut SolverConductors,
    ) -> Result<usize> {
        let mut count = 0;
        for (key, shape) in &self.shapes {
            if self.installed.contains_key(key) {
                continue;
            }
            let data = GenerateConductors::new(grid, shape).settings(settings).execute()?;
            InstallConductors::new(grid, &data).execute(dest)?;
            self.installed.insert(key, ());
            debug!(condid = shape.condid(), parts = data.len(), "installed conductor");
            count += 1;
        }
        Ok(count)
    }

    /// Clears `dest` and installs every registered shape.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling or installing a shape fails.
    pub fn reinstall_all(
        &mut self,
        grid: &Grid,
        settings: &ConductorSettings,
        dest: &mut SolverConductors,
    ) -> Result<usize> {
        dest.clear();
        self.installed.clear();
        let count = self.install_pending(grid, settings, dest)?;
        info!(conductors = count, "reinstalled all conductors");
        Ok(count)
    }
}
