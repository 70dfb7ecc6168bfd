//! Reference data loaded from `data/`

use std::path::PathBuf;

use anyhow::{Context, Result};
use oxdelta_core::LabColor;
use serde::Deserialize;

/// One published CIEDE2000 test pair
#[derive(Debug, Clone, Deserialize)]
pub struct ReferencePair {
    /// Pair number in the source table
    pub pair: u32,
    pub lab1: [f64; 3],
    pub lab2: [f64; 3],
    pub delta_e: f64,
}

impl ReferencePair {
    pub fn colors(&self) -> (LabColor, LabColor) {
        (LabColor::from(self.lab1), LabColor::from(self.lab2))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceSet {
    pub source: String,
    /// Published values are rounded to four decimals
    pub tolerance: f64,
    pub pairs: Vec<ReferencePair>,
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Sharma, Wu and Dalal's CIEDE2000 test data
pub fn load_ciede2000_reference() -> Result<ReferenceSet> {
    let path = data_dir().join("ciede2000_sharma.json");
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
