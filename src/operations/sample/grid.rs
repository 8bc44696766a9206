use std::ops::Range;

use crate::config::{ConductorSettings, Symmetry};
use crate::error::{MeshError, Result};
use crate::geometry::Extent;
use crate::math::{Point3, Vector3};

use super::coarsening::{coarsen_levels, validate_levels, MgLevel};

/// Tolerance, in cells, when deciding which nodes fall inside a window.
const NODE_FUZZ: f64 = 1e-9;

/// Split of the z cells across ranks, and which rank this is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    rank: usize,
    iz: Vec<usize>,
    nz: Vec<usize>,
}

impl Decomposition {
    /// Creates a decomposition from the per-rank first z cell and cell count.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables differ in length or `rank` is not in
    /// the table.
    pub fn new(rank: usize, iz: Vec<usize>, nz: Vec<usize>) -> Result<Self> {
        if iz.len() != nz.len() {
            return Err(MeshError::InvalidDecomposition(format!(
                "{} start indices but {} counts",
                iz.len(),
                nz.len()
            ))
            .into());
        }
        if rank >= iz.len() {
            return Err(MeshError::RankOutOfRange {
                rank,
                ranks: iz.len(),
            }
            .into());
        }
        Ok(Self { rank, iz, nz })
    }

    /// This rank.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// First z cell and cell count of this rank.
    #[must_use]
    pub fn local(&self) -> (usize, usize) {
        (self.iz[self.rank], self.nz[self.rank])
    }
}

/// Base rectilinear mesh.
///
/// `min` and `max` are in the grid frame; node z coordinates in the lab
/// frame are shifted by `zbeam`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    min: Point3,
    max: Point3,
    cells: [usize; 3],
    zbeam: f64,
    decomposition: Option<Decomposition>,
}

impl Mesh {
    /// Creates a single-rank mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if an axis has no cells or an inverted range.
    pub fn new(min: Point3, max: Point3, cells: [usize; 3]) -> Result<Self> {
        for (k, axis) in ["x", "y", "z"].into_iter().enumerate() {
            if cells[k] == 0 {
                return Err(MeshError::NoCells { axis }.into());
            }
            if !(max[k] > min[k]) {
                return Err(MeshError::InvertedBounds {
                    axis,
                    min: min[k],
                    max: max[k],
                }
                .into());
            }
        }
        Ok(Self {
            min,
            max,
            cells,
            zbeam: 0.0,
            decomposition: None,
        })
    }

    /// Sets the lab-frame offset of the grid along z.
    #[must_use]
    pub fn with_zbeam(mut self, zbeam: f64) -> Self {
        self.zbeam = zbeam;
        self
    }

    /// Restricts this process to one rank's z range.
    ///
    /// # Errors
    ///
    /// Returns an error if the rank's range runs past the mesh.
    pub fn with_decomposition(mut self, decomposition: Decomposition) -> Result<Self> {
        let (iz, nz) = decomposition.local();
        if nz == 0 || iz + nz > self.cells[2] {
            return Err(MeshError::InvalidDecomposition(format!(
                "rank range {iz}..{} does not fit {} z cells",
                iz + nz,
                self.cells[2]
            ))
            .into());
        }
        self.decomposition = Some(decomposition);
        Ok(self)
    }

    #[must_use]
    pub fn min(&self) -> &Point3 {
        &self.min
    }

    #[must_use]
    pub fn max(&self) -> &Point3 {
        &self.max
    }

    #[must_use]
    pub fn cells(&self) -> [usize; 3] {
        self.cells
    }

    #[must_use]
    pub fn zbeam(&self) -> f64 {
        self.zbeam
    }

    /// Base cell sizes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn spacing(&self) -> Vector3 {
        Vector3::from_fn(|k, _| (self.max[k] - self.min[k]) / self.cells[k] as f64)
    }

    /// First z cell and cell count handled by this process.
    #[must_use]
    pub fn local_z(&self) -> (usize, usize) {
        self.decomposition
            .as_ref()
            .map_or((0, self.cells[2]), Decomposition::local)
    }
}

/// Node ranges of one level selected for sampling; `iz` is level-local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeWindow {
    pub ix: Range<usize>,
    pub iy: Range<usize>,
    pub iz: Range<usize>,
}

impl NodeWindow {
    /// Number of nodes in one z slice.
    #[must_use]
    pub fn slice_len(&self) -> usize {
        self.ix.len() * self.iy.len()
    }
}

/// Geometry of one multigrid level on this rank.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMesh {
    pub level: usize,
    pub spacing: Vector3,
    /// Cells along x, y and the rank's local z.
    pub cells: [usize; 3],
    /// Lab-frame position of local node `(0, 0, 0)`.
    pub origin: Point3,
}

impl LevelMesh {
    /// Lab-frame position of a node.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn node(&self, index: [usize; 3]) -> Point3 {
        Point3::from(Vector3::from_fn(|k, _| {
            self.origin[k] + index[k] as f64 * self.spacing[k]
        }))
    }

    /// Region covered by the level's nodes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn domain(&self) -> Extent {
        let far = Vector3::from_fn(|k, _| self.origin[k] + self.cells[k] as f64 * self.spacing[k]);
        Extent::new(self.origin, Point3::from(far))
    }

    /// Nodes within one cell of `[lo, hi]`, or `None` when there are none.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn window(&self, lo: &Point3, hi: &Point3) -> Option<NodeWindow> {
        let mut ranges = [0..0, 0..0, 0..0];
        for k in 0..3 {
            let step = self.spacing[k];
            if lo[k] - step > hi[k] {
                return None;
            }
            let n = self.cells[k] as f64;
            let first = ((lo[k] - step - self.origin[k]) / step - NODE_FUZZ).ceil().clamp(0.0, n);
            let last = ((hi[k] + step - self.origin[k]) / step + NODE_FUZZ).floor().clamp(0.0, n);
            if first > last {
                return None;
            }
            ranges[k] = first as usize..last as usize + 1;
        }
        let [ix, iy, iz] = ranges;
        Some(NodeWindow { ix, iy, iz })
    }
}

/// Mesh, multigrid levels, crop box and symmetry used to sample conductors.
#[derive(Debug, Clone)]
pub struct Grid {
    mesh: Mesh,
    levels: Vec<MgLevel>,
    crop: Extent,
    symmetry: Symmetry,
}

impl Grid {
    /// Creates a grid with the default coarsening table.
    #[must_use]
    pub fn new(mesh: Mesh) -> Self {
        let (iz, nz) = mesh.local_z();
        let h = mesh.spacing();
        let levels = coarsen_levels(mesh.cells(), [h.x, h.y, h.z], iz, nz, None);
        Self {
            mesh,
            levels,
            crop: Extent::unbounded(),
            symmetry: Symmetry::None,
        }
    }

    /// Creates a grid honouring the level cap and symmetry of `settings`.
    #[must_use]
    pub fn from_settings(mesh: Mesh, settings: &ConductorSettings) -> Self {
        let mut grid = Self::new(mesh).with_symmetry(settings.symmetry);
        if let Some(max) = settings.max_levels {
            grid = grid.with_max_levels(max);
        }
        grid
    }

    /// Replaces the coarsening table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not fit the mesh or reaches z
    /// cells outside this rank's range.
    pub fn with_levels(mut self, levels: Vec<MgLevel>) -> Result<Self> {
        validate_levels(&levels, self.mesh.cells(), self.mesh.local_z())?;
        self.levels = levels;
        Ok(self)
    }

    /// Keeps at most `max` levels (at least one).
    #[must_use]
    pub fn with_max_levels(mut self, max: usize) -> Self {
        self.levels.truncate(max.max(1));
        self
    }

    /// Only samples conductors inside `crop` (lab frame).
    ///
    /// With a mirror symmetry the crop box is further clipped to the
    /// non-negative side of the mirrored axes. The mesh itself is not moved:
    /// node positions and indices still start at the mesh minimum.
    #[must_use]
    pub fn with_crop(mut self, crop: Extent) -> Self {
        self.crop = crop;
        self
    }

    #[must_use]
    pub fn with_symmetry(mut self, symmetry: Symmetry) -> Self {
        self.symmetry = symmetry;
        self
    }

    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[must_use]
    pub fn levels(&self) -> &[MgLevel] {
        &self.levels
    }

    #[must_use]
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Crop box after clipping mirrored axes to non-negative coordinates.
    #[must_use]
    pub fn crop(&self) -> Extent {
        let mut crop = self.crop;
        match self.symmetry {
            Symmetry::None => {}
            Symmetry::MirrorY => crop.min.y = crop.min.y.max(0.0),
            Symmetry::MirrorXY => {
                crop.min.x = crop.min.x.max(0.0);
                crop.min.y = crop.min.y.max(0.0);
            }
        }
        crop
    }

    /// Geometry of a level on this rank.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::LevelOutOfRange`] for a level not in the table.
    #[allow(clippy::cast_precision_loss)]
    pub fn level_mesh(&self, level: usize) -> Result<LevelMesh> {
        let mg = self.levels.get(level).ok_or(MeshError::LevelOutOfRange {
            level,
            levels: self.levels.len(),
        })?;
        let base = self.mesh.spacing();
        let spacing = Vector3::from_fn(|k, _| base[k] * mg.stride[k] as f64);
        let cells = self.mesh.cells();
        let min = self.mesh.min();
        Ok(LevelMesh {
            level,
            spacing,
            cells: [cells[0] / mg.stride[0], cells[1] / mg.stride[1], mg.nz],
            origin: Point3::new(
                min.x,
                min.y,
                min.z + mg.iz as f64 * spacing.z + self.mesh.zbeam(),
            ),
        })
    }

    /// Nodes of `level` worth sampling for a shape with the given extent:
    /// those within one cell of the extent clipped to the crop box and to
    /// the level's local domain.
    #[must_use]
    pub fn window(&self, level: usize, extent: &Extent) -> Option<NodeWindow> {
        let mesh = self.level_mesh(level).ok()?;
        let bounds = extent.intersection(&self.crop()).intersection(&mesh.domain());
        mesh.window(&bounds.min, &bounds.max)
    }

    /// Returns true if some node of `level` is within one cell of `extent`.
    #[must_use]
    pub fn check_overlap(&self, level: usize, extent: &Extent) -> bool {
        self.window(level, extent).is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cube_mesh() -> Mesh {
        Mesh::new(Point3::new(-2.0, -2.0, -2.0), Point3::new(2.0, 2.0, 2.0), [8, 8, 8]).unwrap()
    }

    #[test]
    fn mesh_validation() {
        assert!(Mesh::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0), [0, 1, 1]).is_err());
        assert!(Mesh::new(Point3::origin(), Point3::new(1.0, -1.0, 1.0), [1, 1, 1]).is_err());
        let m = cube_mesh();
        assert!((m.spacing() - Vector3::new(0.5, 0.5, 0.5)).norm() < 1e-15);
    }

    #[test]
    fn decomposition_checks() {
        assert!(Decomposition::new(2, vec![0, 4], vec![4, 4]).is_err());
        assert!(Decomposition::new(0, vec![0], vec![4, 4]).is_err());
        let d = Decomposition::new(1, vec![0, 4], vec![4, 4]).unwrap();
        let m = cube_mesh().with_decomposition(d).unwrap();
        assert_eq!(m.local_z(), (4, 4));
        let too_far = Decomposition::new(0, vec![6], vec![4]).unwrap();
        assert!(cube_mesh().with_decomposition(too_far).is_err());
    }

    #[test]
    fn window_covers_extent_plus_one_cell() {
        let grid = Grid::new(cube_mesh());
        let e = Extent::symmetric(Vector3::new(1.0, 1.0, 1.0));
        let w = grid.window(0, &e).unwrap();
        assert_eq!(w.ix, 1..8);
        assert_eq!(w.iz, 1..8);
        assert_eq!(w.slice_len(), 49);
    }

    #[test]
    fn far_extent_does_not_overlap() {
        let grid = Grid::new(cube_mesh());
        let e = Extent::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        assert!(!grid.check_overlap(0, &e));
        let touching = Extent::new(Point3::new(2.4, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0));
        assert!(grid.check_overlap(0, &touching));
    }

    #[test]
    fn rank_level_origin_includes_offset() {
        let d = Decomposition::new(1, vec![0, 4], vec![4, 4]).unwrap();
        let mesh = cube_mesh().with_zbeam(10.0).with_decomposition(d).unwrap();
        let grid = Grid::new(mesh);
        let lm = grid.level_mesh(1).unwrap();
        assert_eq!(lm.cells, [4, 4, 2]);
        assert!((lm.origin.z - 10.0).abs() < 1e-12);
        assert!((lm.node([0, 0, 2]).z - 12.0).abs() < 1e-12);
        assert!(grid.level_mesh(9).is_err());
    }

    #[test]
    fn custom_levels_must_match_rank_range() {
        let d = Decomposition::new(1, vec![0, 4], vec![4, 4]).unwrap();
        let mesh = cube_mesh().with_decomposition(d).unwrap();
        let own = vec![
            MgLevel { stride: [1, 1, 1], iz: 4, nz: 4 },
            MgLevel { stride: [2, 2, 2], iz: 2, nz: 2 },
        ];
        assert!(Grid::new(mesh.clone()).with_levels(own).is_ok());
        let other_rank = vec![MgLevel { stride: [1, 1, 1], iz: 0, nz: 4 }];
        let err = Grid::new(mesh).with_levels(other_rank).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CutcellError::Mesh(MeshError::InvalidLevels(_))
        ));
    }

    #[test]
    fn symmetry_clips_crop_only() {
        let grid = Grid::new(cube_mesh()).with_symmetry(Symmetry::MirrorXY);
        let crop = grid.crop();
        assert_eq!(crop.min.x, 0.0);
        assert_eq!(crop.min.y, 0.0);
        assert!(crop.min.z < -1.0);
        let w = grid.window(0, &Extent::unbounded()).unwrap();
        assert_eq!(w.ix, 3..9);
        assert_eq!(grid.level_mesh(0).unwrap().origin.x, -2.0);
    }

    #[test]
    fn settings_cap_levels() {
        let settings = ConductorSettings {
            max_levels: Some(2),
            ..ConductorSettings::default()
        };
        let grid = Grid::from_settings(cube_mesh(), &settings);
        assert_eq!(grid.levels().len(), 2);
        assert_eq!(Grid::new(cube_mesh()).levels().len(), 3);
    }
}
