use crate::error::{MeshError, Result};

/// One multigrid level: coarsening strides relative to the base mesh and the
/// rank's z range in level cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MgLevel {
    /// Base cells per level cell along x, y and z.
    pub stride: [usize; 3],
    /// First z cell of the rank's range.
    pub iz: usize,
    /// Number of z cells in the rank's range.
    pub nz: usize,
}

/// Builds the coarsening table.
///
/// Level 0 is the base mesh. Coarsening continues while the cell counts of
/// the current level are all divisible by four and fewer than `max_levels`
/// levels exist. When `dz` exceeds `4/3 dx` only x and y are coarsened.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coarsen_levels(
    cells: [usize; 3],
    spacing: [f64; 3],
    rank_iz: usize,
    rank_nz: usize,
    max_levels: Option<usize>,
) -> Vec<MgLevel> {
    let max_levels = max_levels.unwrap_or(usize::MAX).max(1);
    let mut stride = [1usize; 3];
    let mut levels = vec![MgLevel {
        stride,
        iz: rank_iz,
        nz: rank_nz,
    }];

    while levels.len() < max_levels {
        let n = [0, 1, 2].map(|k| cells[k] / stride[k]);
        if n.iter().any(|c| c % 4 != 0) {
            break;
        }
        let dx = spacing[0] * stride[0] as f64;
        let dz = spacing[2] * stride[2] as f64;
        stride[0] *= 2;
        stride[1] *= 2;
        if dz <= 4.0 / 3.0 * dx {
            stride[2] *= 2;
        }
        levels.push(MgLevel {
            stride,
            iz: rank_iz / stride[2],
            nz: rank_nz / stride[2],
        });
    }
    levels
}

/// Checks a caller-supplied table against the mesh and the rank's z range
/// `(iz, nz)` in base cells.
///
/// # Errors
///
/// Returns [`MeshError::InvalidLevels`] if the table is empty, level 0 is not
/// the base mesh, a stride does not divide the cell count, or a level's z
/// range leaves the mesh or the rank's range.
pub fn validate_levels(levels: &[MgLevel], cells: [usize; 3], rank: (usize, usize)) -> Result<()> {
    let Some(first) = levels.first() else {
        return Err(MeshError::InvalidLevels("table is empty".into()).into());
    };
    if first.stride != [1, 1, 1] {
        return Err(MeshError::InvalidLevels("level 0 must have unit strides".into()).into());
    }
    for (i, level) in levels.iter().enumerate() {
        for k in 0..3 {
            if level.stride[k] == 0 || cells[k] % level.stride[k] != 0 {
                return Err(MeshError::InvalidLevels(format!(
                    "level {i}: stride {} does not divide {} cells",
                    level.stride[k], cells[k]
                ))
                .into());
            }
        }
        let sz = level.stride[2];
        let (lo, hi) = (level.iz * sz, (level.iz + level.nz) * sz);
        if hi > cells[2] || lo < rank.0 || hi > rank.0 + rank.1 {
            return Err(MeshError::InvalidLevels(format!(
                "level {i}: z cells {lo}..{hi} are outside the rank range {}..{}",
                rank.0,
                rank.0 + rank.1
            ))
            .into());
        }
    }
    Ok(())
}
