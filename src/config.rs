//! Approximation settings
//!
//! Tolerances used when an exact notation does not exist and a conversion
//! has to approximate. Settings can be loaded from JSON; missing fields keep
//! their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};
use crate::notation::fjs::FjsFlavor;

fn default_fraction_epsilon() -> f64 {
    1e-4
}

fn default_max_radical_index() -> u32 {
    5
}

fn default_max_radical_height() -> i64 {
    50_000
}

fn default_simple_tolerance() -> f64 {
    3.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproximationSettings {
    /// Relative error accepted by fraction approximation
    #[serde(default = "default_fraction_epsilon")]
    pub fraction_epsilon: f64,

    #[serde(default = "default_max_radical_index")]
    pub max_radical_index: u32,

    /// Largest numerator or denominator of a radicand
    #[serde(default = "default_max_radical_height")]
    pub max_radical_height: i64,

    /// Cents tolerance of the simple approximation behind FJS fallbacks
    #[serde(default = "default_simple_tolerance")]
    pub simple_tolerance: f64,

    #[serde(default)]
    pub default_flavor: FjsFlavor,
}

impl Default for ApproximationSettings {
    fn default() -> Self {
        ApproximationSettings {
            fraction_epsilon: default_fraction_epsilon(),
            max_radical_index: default_max_radical_index(),
            max_radical_height: default_max_radical_height(),
            simple_tolerance: default_simple_tolerance(),
            default_flavor: FjsFlavor::default(),
        }
    }
}

impl ApproximationSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: ApproximationSettings =
            serde_json::from_str(json).map_err(|e| IntervalError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| IntervalError::Settings(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loading approximation settings from {}", path.display());
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| IntervalError::Settings(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if !(self.fraction_epsilon > 0.0) {
            return Err(IntervalError::Settings(
                "fraction_epsilon must be positive".to_string(),
            ));
        }
        if self.max_radical_index == 0 || self.max_radical_height < 1 {
            return Err(IntervalError::Settings(
                "radical limits must be at least one".to_string(),
            ));
        }
        if !(self.simple_tolerance > 0.0) {
            return Err(IntervalError::Settings(
                "simple_tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
