//! # delta-tests
//!
//! Parity testing framework for oxdelta.
//!
//! This crate provides:
//! - Seeded color generators so every run sees the same data
//! - Reference conversions from the `palette` crate
//! - Brute-force rankings used as ground truth for the spatial index
//! - The published CIEDE2000 reference pairs
//!
//! ## Test Categories
//!
//! 1. **Index parity**: k-d tree queries against linear scans
//! 2. **CIEDE2000 reference**: published pair values
//! 3. **Palette parity**: sRGB → XYZ → LAB against `palette`
//! 4. **Cache concurrency**: the LRU bound under parallel load

pub mod fixtures;
pub mod patterns;
pub mod reference;

pub use fixtures::{ReferencePair, ReferenceSet, load_ciede2000_reference};
pub use patterns::{lattice_lab_colors, random_lab_colors, random_rgb_colors};
pub use reference::{brute_force_ranking, palette_lab, palette_rgb_from_lab, palette_xyz};
