use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::ConductorSettings;
use crate::error::Result;
use crate::geometry::{Delta, Parity, ParityThresholds, Shape};

use super::grid::{Grid, LevelMesh, NodeWindow};

/// Records sampled from one shape (or one part of a union), all sharing a
/// boundary kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConductorData {
    pub neumann: bool,
    pub deltas: Vec<Delta>,
}

impl ConductorData {
    /// Number of records with the given parity.
    #[must_use]
    pub fn count(&self, parity: Parity) -> usize {
        self.deltas.iter().filter(|d| d.parity == parity).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Samples a shape on every multigrid level of a grid.
///
/// Unions are split so each part is only sampled within its own extent;
/// the result holds one [`ConductorData`] per part that produced records.
pub struct GenerateConductors<'a> {
    grid: &'a Grid,
    shape: &'a Shape,
    settings: ConductorSettings,
}

impl<'a> GenerateConductors<'a> {
    /// Creates a new `GenerateConductors` operation with default settings.
    #[must_use]
    pub fn new(grid: &'a Grid, shape: &'a Shape) -> Self {
        Self {
            grid,
            shape,
            settings: ConductorSettings::default(),
        }
    }

    /// Uses the fill depth, fuzz and time of `settings`.
    #[must_use]
    pub fn settings(mut self, settings: &ConductorSettings) -> Self {
        self.settings = settings.clone();
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape mixes Neumann and Dirichlet leaves.
    pub fn execute(&self) -> Result<Vec<ConductorData>> {
        self.shape.boundary_kind()?;
        let mut out = Vec::new();
        self.collect(self.shape, &mut out)?;
        Ok(out)
    }

    fn collect(&self, shape: &Shape, out: &mut Vec<ConductorData>) -> Result<()> {
        let extent = shape.extent();
        let levels = self.grid.levels().len();
        if !(0..levels).any(|level| self.grid.check_overlap(level, extent)) {
            trace!(condid = shape.condid(), "shape outside grid");
            return Ok(());
        }

        if let Some((left, right)) = shape.as_union() {
            self.collect(left, out)?;
            return self.collect(right, out);
        }

        let data = self.sample(shape)?;
        if !data.is_empty() {
            out.push(data);
        }
        Ok(())
    }

    fn sample(&self, shape: &Shape) -> Result<ConductorData> {
        let neumann = shape.is_neumann();
        let thresholds = self.settings.thresholds(neumann);
        let time = self.settings.time;
        let mut deltas = Vec::new();

        for level in 0..self.grid.levels().len() {
            let Some(window) = self.grid.window(level, shape.extent()) else {
                continue;
            };
            let mesh = self.grid.level_mesh(level)?;
            let slices: Vec<Vec<Delta>> = window
                .iz
                .clone()
                .into_par_iter()
                .map(|iz| sample_slice(shape, &mesh, &window, iz, &thresholds, time))
                .collect();
            let before = deltas.len();
            deltas.extend(slices.into_iter().flatten());
            debug!(
                level,
                condid = shape.condid(),
                nodes = window.slice_len() * window.iz.len(),
                records = deltas.len() - before,
                "sampled level"
            );
        }

        Ok(ConductorData { neumann, deltas })
    }
}

/// Distance records of one z slice that survive classification.
fn sample_slice(
    shape: &Shape,
    mesh: &LevelMesh,
    window: &NodeWindow,
    iz: usize,
    thresholds: &ParityThresholds,
    time: f64,
) -> Vec<Delta> {
    let mut out = Vec::new();
    for ix in window.ix.clone() {
        for iy in window.iy.clone() {
            let index = [ix, iy, iz];
            let mut delta = shape.grid_distance(index, &mesh.node(index), time);
            delta.normalize(&mesh.spacing);
            if delta.classify(thresholds) != Parity::Far {
                delta.level = mesh.level;
                out.push(delta);
            }
        }
    }
    trace!(level = mesh.level, iz, records = out.len(), "sampled slice");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::{CutcellError, InstallError};
    use crate::geometry::Extent;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBox, MakeCylinder, MakeSphere};
    use crate::operations::sample::Mesh;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn cube(half: f64, cells: usize) -> Mesh {
        Mesh::new(
            Point3::new(-half, -half, -half),
            Point3::new(half, half, half),
            [cells; 3],
        )
        .unwrap()
    }

    fn cut_count(data: &[ConductorData]) -> usize {
        data.iter()
            .map(|d| d.count(Parity::Even) + d.count(Parity::Odd))
            .sum()
    }

    #[test]
    fn box_interior_and_face_cells() {
        init_tracing();
        let grid = Grid::new(cube(2.0, 8)).with_max_levels(1);
        let shape = MakeBox::new(2.0, 2.0, 2.0).voltage(5.0).condid(3).execute().unwrap();
        let data = GenerateConductors::new(&grid, &shape).execute().unwrap();
        assert_eq!(data.len(), 1);
        let data = &data[0];
        assert_eq!(data.count(Parity::Interior), 125);
        assert_eq!(data.count(Parity::Even) + data.count(Parity::Odd), 150);
        assert_eq!(data.deltas.len(), 275);

        for d in &data.deltas {
            assert_eq!(d.level, 0);
            let depth = d.position.coords.amax();
            if d.parity == Parity::Interior {
                assert!(depth <= 1.0 + 1e-12);
                assert!((d.volts[0] - 5.0).abs() < 1e-15);
                assert_eq!(d.ids[0], 3);
            } else {
                assert!((depth - 1.5).abs() < 1e-12);
                let sum: usize = d.index.iter().sum();
                let expected = if sum % 2 == 0 { Parity::Even } else { Parity::Odd };
                assert_eq!(d.parity, expected);
            }
        }
    }

    #[test]
    fn shallow_fill_drops_the_deepest_nodes() {
        let grid = Grid::new(cube(2.0, 8)).with_max_levels(1);
        let shape = MakeBox::new(2.0, 2.0, 2.0).voltage(5.0).execute().unwrap();
        let settings = ConductorSettings {
            dfill: 1.0,
            ..ConductorSettings::default()
        };
        let data = GenerateConductors::new(&grid, &shape)
            .settings(&settings)
            .execute()
            .unwrap();
        assert_eq!(data[0].count(Parity::Interior), 124);
        assert_eq!(cut_count(&data), 150);
        assert!(data[0].deltas.iter().all(|d| d.index != [4, 4, 4]));
    }

    #[test]
    fn sphere_cut_cells_are_mirror_symmetric() {
        let grid = Grid::new(cube(4.0, 8));
        let shape = MakeSphere::new(1.0).execute().unwrap();
        let data = GenerateConductors::new(&grid, &shape).execute().unwrap();
        let cut: HashSet<([i64; 3], Parity)> = data
            .iter()
            .flat_map(|d| &d.deltas)
            .filter(|d| d.level == 0 && matches!(d.parity, Parity::Even | Parity::Odd))
            .map(|d| (rounded(&d.position), d.parity))
            .collect();
        assert!(!cut.is_empty());
        for (p, parity) in &cut {
            for k in 0..3 {
                let mut m = *p;
                m[k] = -m[k];
                assert!(cut.contains(&(m, *parity)), "mirror of {p:?} along {k}");
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn rounded(p: &Point3) -> [i64; 3] {
        [p.x.round() as i64, p.y.round() as i64, p.z.round() as i64]
    }

    #[test]
    fn identical_difference_leaves_nothing() {
        let grid = Grid::new(cube(2.0, 8));
        let c = MakeCylinder::new(1.0, 2.0).execute().unwrap();
        let shape = c.clone() - c;
        let data = GenerateConductors::new(&grid, &shape).execute().unwrap();
        assert!(data.iter().all(ConductorData::is_empty));
    }

    #[test]
    fn unions_are_sampled_per_part() {
        let grid = Grid::new(cube(4.0, 16)).with_max_levels(1);
        let a = MakeSphere::new(0.75).center(-2.0, 0.0, 0.0).execute().unwrap();
        let b = MakeSphere::new(0.75).center(2.0, 0.0, 0.0).execute().unwrap();
        let alone_a = GenerateConductors::new(&grid, &a).execute().unwrap();
        let alone_b = GenerateConductors::new(&grid, &b).execute().unwrap();
        let both = GenerateConductors::new(&grid, &(a | b)).execute().unwrap();
        assert_eq!(both.len(), 2);
        assert_eq!(both[0], alone_a[0]);
        assert_eq!(both[1], alone_b[0]);
    }

    #[test]
    fn shape_outside_mesh_gives_no_data() {
        let grid = Grid::new(cube(2.0, 8));
        let shape = MakeSphere::new(0.5).center(10.0, 0.0, 0.0).execute().unwrap();
        assert!(GenerateConductors::new(&grid, &shape).execute().unwrap().is_empty());
    }

    #[test]
    fn crop_box_limits_sampling() {
        let crop = Extent::new(Point3::new(0.25, -5.0, -5.0), Point3::new(5.0, 5.0, 5.0));
        let grid = Grid::new(cube(2.0, 8)).with_max_levels(1).with_crop(crop);
        let shape = MakeBox::new(2.0, 2.0, 2.0).execute().unwrap();
        let data = GenerateConductors::new(&grid, &shape).execute().unwrap();
        assert!(data[0].deltas.iter().all(|d| d.position.x >= -0.25 - 1e-12));
    }

    #[test]
    fn mixed_boundary_kinds_are_rejected() {
        let grid = Grid::new(cube(2.0, 8));
        let a = MakeSphere::new(1.0).execute().unwrap();
        let b = MakeBox::new(1.0, 1.0, 1.0).neumann(true).execute().unwrap();
        let err = GenerateConductors::new(&grid, &(a & b)).execute().unwrap_err();
        assert!(matches!(err, CutcellError::Install(InstallError::MixedBoundaryKinds)));
    }

    #[test]
    fn neumann_box_keeps_surface_nodes_as_cut_cells() {
        let grid = Grid::new(cube(2.0, 8)).with_max_levels(1);
        let shape = MakeBox::new(2.0, 2.0, 2.0).neumann(true).execute().unwrap();
        let data = GenerateConductors::new(&grid, &shape).execute().unwrap();
        assert!(data[0].neumann);
        assert_eq!(data[0].count(Parity::Interior), 0);
        assert_eq!(cut_count(&data), 98);
    }

    #[test]
    fn every_level_is_sampled_within_its_mesh() {
        let grid = Grid::new(cube(4.0, 16));
        let shape = MakeSphere::new(2.5).execute().unwrap();
        let data = GenerateConductors::new(&grid, &shape).execute().unwrap();
        for level in 0..grid.levels().len() {
            let mesh = grid.level_mesh(level).unwrap();
            let records: Vec<_> = data[0].deltas.iter().filter(|d| d.level == level).collect();
            assert!(!records.is_empty(), "level {level}");
            for d in records {
                assert!((0..3).all(|k| d.index[k] <= mesh.cells[k]));
                assert!((mesh.node(d.index) - d.position).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn sampling_is_deterministic() {
        let grid = Grid::new(cube(4.0, 16));
        let shape = MakeCylinder::new(1.3, 3.0)
            .center(0.2, -0.1, 0.0)
            .execute()
            .unwrap()
            .minus(MakeSphere::new(0.7).execute().unwrap());
        let first = GenerateConductors::new(&grid, &shape).execute().unwrap();
        let second = GenerateConductors::new(&grid, &shape).execute().unwrap();
        assert_eq!(first, second);
        assert!(first[0].deltas.iter().all(Delta::is_normalized));
    }
}
