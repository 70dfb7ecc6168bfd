//! Seeded color generators

use oxdelta_core::{LabColor, RgbColor};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Uniform LAB colors over L in [0, 100] and a, b in [-128, 128]
pub fn random_lab_colors(seed: u64, count: usize) -> Vec<LabColor> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            LabColor::new(
                rng.gen_range(0.0..=100.0),
                rng.gen_range(-128.0..=128.0),
                rng.gen_range(-128.0..=128.0),
            )
        })
        .collect()
}

/// Uniform 8-bit sRGB colors
pub fn random_rgb_colors(seed: u64, count: usize) -> Vec<RgbColor> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| RgbColor::new(rng.r#gen(), rng.r#gen(), rng.r#gen()))
        .collect()
}

/// LAB colors snapped to a coarse grid so many candidates tie exactly
pub fn lattice_lab_colors(seed: u64, count: usize, step: f64) -> Vec<LabColor> {
    let snap = |v: f64| (v / step).round() * step;
    random_lab_colors(seed, count)
        .into_iter()
        .map(|lab| LabColor::new(snap(lab.l), snap(lab.a), snap(lab.b)))
        .collect()
}
