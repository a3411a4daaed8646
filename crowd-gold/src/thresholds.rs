//! Acceptance thresholds, with TOML file loading.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{GoldError, GoldResult};

/// Agreement levels a candidate must clear before it becomes gold.
///
/// The defaults are the calibration the estimation rules were tuned with:
/// half of the attempting workers must have marked anything at all, and the
/// unitized alpha must reach `0.6` unless an absolute majority overrides it
/// (see [`ABSOLUTE_MAJORITY`](crate::ABSOLUTE_MAJORITY)).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    /// Minimum binary agreement.
    #[serde(default = "default_binary")]
    pub binary: f64,
    /// Minimum alpha-u agreement.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_binary() -> f64 {
    0.5
}

fn default_alpha() -> f64 {
    0.6
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            binary: default_binary(),
            alpha: default_alpha(),
        }
    }
}

impl Thresholds {
    pub fn new(binary: f64, alpha: f64) -> Self {
        Thresholds { binary, alpha }
    }

    /// Load thresholds from a TOML file.
    ///
    /// A missing file is not an error; it yields the defaults. Unknown keys
    /// are ignored, absent keys fall back to their defaults.
    pub fn load(path: &Path) -> GoldResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GoldError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| GoldError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
