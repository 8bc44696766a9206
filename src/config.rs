//! Tunable knobs for conductor generation and point queries.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::geometry::ParityThresholds;
use crate::math::SURFACE_FUZZ;

/// Mirror symmetry of the simulation domain.
///
/// Symmetric runs only sample the non-negative side of the mirrored axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symmetry {
    #[default]
    None,
    /// Mirror about `y = 0`.
    MirrorY,
    /// Mirror about `x = 0` and `y = 0`.
    MirrorXY,
}

/// Settings shared by sampling, installation and point queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConductorSettings {
    /// Inside nodes deeper than this many cells are not stored.
    pub dfill: f64,
    /// Distances (in cells) below this count as inside.
    pub fuzz_outside: f64,
    /// Slack on the fill depth and on the one-cell cut test.
    pub fuzz_inside: f64,
    /// Intercept candidates closer than this to the combined surface are accepted.
    pub surface_fuzz: f64,
    /// Extra margin for inside tests.
    pub aura: f64,
    /// Simulation time at which voltages are evaluated.
    pub time: f64,
    /// Cap on the number of multigrid levels; unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_levels: Option<usize>,
    pub symmetry: Symmetry,
}

impl Default for ConductorSettings {
    fn default() -> Self {
        Self {
            dfill: 2.0,
            fuzz_outside: 1e-9,
            fuzz_inside: 1e-9,
            surface_fuzz: SURFACE_FUZZ,
            aura: 0.0,
            time: 0.0,
            max_levels: None,
            symmetry: Symmetry::None,
        }
    }
}

impl ConductorSettings {
    /// Parses settings from TOML; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for these settings or
    /// a value fails [`ConductorSettings::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).map_err(ConfigError::from)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_toml_str(&text)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad setting.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("dfill", self.dfill),
            ("fuzz_outside", self.fuzz_outside),
            ("fuzz_inside", self.fuzz_inside),
            ("surface_fuzz", self.surface_fuzz),
            ("aura", self.aura),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    name,
                    reason: format!("must be finite and non-negative, got {value}"),
                }
                .into());
            }
        }
        if !self.time.is_finite() {
            return Err(ConfigError::Invalid {
                name: "time",
                reason: "must be finite".into(),
            }
            .into());
        }
        if self.max_levels == Some(0) {
            return Err(ConfigError::Invalid {
                name: "max_levels",
                reason: "at least one level is required".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Classification thresholds for a Dirichlet or Neumann shape.
    #[must_use]
    pub fn thresholds(&self, neumann: bool) -> ParityThresholds {
        if neumann {
            ParityThresholds::neumann(self.fuzz_inside)
        } else {
            ParityThresholds::dirichlet(self.dfill, self.fuzz_outside, self.fuzz_inside)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CutcellError;

    #[test]
    fn empty_document_gives_defaults() {
        let s = ConductorSettings::from_toml_str("").unwrap();
        assert_eq!(s, ConductorSettings::default());
        assert_eq!(s.dfill, 2.0);
        assert_eq!(s.symmetry, Symmetry::None);
    }

    #[test]
    fn defaults_survive_toml_round_trip() {
        let text = toml::to_string(&ConductorSettings::default()).unwrap();
        let back = ConductorSettings::from_toml_str(&text).unwrap();
        assert_eq!(back, ConductorSettings::default());
    }

    #[test]
    fn partial_document_overrides() {
        let s = ConductorSettings::from_toml_str(
            "dfill = 3.5\nmax_levels = 2\nsymmetry = \"mirror_xy\"\n",
        )
        .unwrap();
        assert_eq!(s.dfill, 3.5);
        assert_eq!(s.max_levels, Some(2));
        assert_eq!(s.symmetry, Symmetry::MirrorXY);
        assert_eq!(s.fuzz_inside, 1e-9);
    }

    #[test]
    fn negative_fill_is_rejected() {
        let err = ConductorSettings::from_toml_str("dfill = -1.0").unwrap_err();
        assert!(matches!(
            err,
            CutcellError::Config(ConfigError::Invalid { name: "dfill", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ConductorSettings::from_toml_str("dfill = ").unwrap_err();
        assert!(matches!(err, CutcellError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn neumann_thresholds_have_no_fill() {
        let s = ConductorSettings::default();
        let t = s.thresholds(true);
        assert_eq!(t.dfill, 0.0);
        assert_eq!(t.fuzz_outside, 0.0);
        let t = s.thresholds(false);
        assert!((t.cut_limit - (1.0 + 1e-9)).abs() < 1e-15);
    }
}
