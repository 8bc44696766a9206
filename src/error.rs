use std::collections::TryReserveError;

use thiserror::Error;

/// Top-level error type for the cutcell conductor generator.
#[derive(Debug, Error)]
pub enum CutcellError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while constructing shapes from their parameters.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("profile segment {segment}: radius {radius} is smaller than half the chord length {chord}")]
    ArcRadiusTooSmall {
        segment: usize,
        radius: f64,
        chord: f64,
    },

    #[error("profile segment {segment}: endpoints are at radii {first} and {second} from the arc center")]
    ArcEndpointsMismatch {
        segment: usize,
        first: f64,
        second: f64,
    },

    #[error("profile z data must be non-decreasing (segment {segment})")]
    NonMonotonicProfile { segment: usize },

    #[error("table {table} has length {found}, expected {expected}")]
    TableLength {
        table: &'static str,
        found: usize,
        expected: usize,
    },
}

/// Errors related to the mesh description and multigrid level table.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh has no cells along {axis}")]
    NoCells { axis: &'static str },

    #[error("mesh upper bound along {axis} ({max}) is not above the lower bound ({min})")]
    InvertedBounds { axis: &'static str, min: f64, max: f64 },

    #[error("rank {rank} is outside the decomposition table of {ranks} ranks")]
    RankOutOfRange { rank: usize, ranks: usize },

    #[error("invalid decomposition: {0}")]
    InvalidDecomposition(String),

    #[error("invalid multigrid level table: {0}")]
    InvalidLevels(String),

    #[error("level {level} does not exist (grid has {levels} levels)")]
    LevelOutOfRange { level: usize, levels: usize },
}

/// Errors raised while generating or installing conductor data.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to grow solver conductor arrays")]
    Allocation(#[from] TryReserveError),

    #[error("a shape tree mixes Neumann and Dirichlet boundaries")]
    MixedBoundaryKinds,

    #[error("conductor is not registered")]
    UnknownConductor,
}

/// Errors related to loading and validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Convenience type alias for results using [`CutcellError`].
pub type Result<T> = std::result::Result<T, CutcellError>;
