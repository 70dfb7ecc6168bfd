//! Engine configuration
//!
//! All knobs have defaults matching the standard formulas; a config only
//! needs to mention what it changes.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default number of entries held by the conversion cache
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Default number of colors per k-d tree leaf
pub const DEFAULT_LEAF_SIZE: usize = 8;

/// Default batch size below which batch paths stay on the calling thread
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Weighting parameters for CIE94
///
/// The defaults are the graphic-arts constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cie94Params {
    /// Lightness weight
    pub k_l: f64,
    /// Chroma weight
    pub k_c: f64,
    /// Hue weight
    pub k_h: f64,
    /// Chroma scaling constant
    pub k1: f64,
    /// Hue scaling constant
    pub k2: f64,
}

impl Default for Cie94Params {
    fn default() -> Self {
        Self {
            k_l: 1.0,
            k_c: 1.0,
            k_h: 1.0,
            k1: 0.045,
            k2: 0.015,
        }
    }
}

impl Cie94Params {
    /// Textile-industry constants (kL = 2, K1 = 0.048, K2 = 0.014)
    pub fn textiles() -> Self {
        Self {
            k_l: 2.0,
            k1: 0.048,
            k2: 0.014,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (name, value) in [("k_l", self.k_l), ("k_c", self.k_c), ("k_h", self.k_h)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "cie94.{name} must be finite and positive, got {value}"
                )));
            }
        }
        for (name, value) in [("k1", self.k1), ("k2", self.k2)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "cie94.{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Spatial index tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Maximum number of colors stored in one leaf
    pub leaf_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            leaf_size: DEFAULT_LEAF_SIZE,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Conversion cache capacity; 0 disables caching
    pub cache_capacity: usize,
    /// CIE94 weights used when no explicit parameters are passed
    pub cie94: Cie94Params,
    /// Spatial index tuning
    pub index: IndexConfig,
    /// Batches smaller than this are processed serially
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cie94: Cie94Params::default(),
            index: IndexConfig::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.index.leaf_size == 0 {
            return Err(Error::InvalidConfig("index.leaf_size must be at least 1".into()));
        }
        self.cie94.validate()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
