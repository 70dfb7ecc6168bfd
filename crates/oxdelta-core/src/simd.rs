//! Multi-versioned batch kernels
//!
//! The loops are plain scalar code; `multiversion` compiles one copy per
//! target feature set and dispatches at runtime, letting the compiler
//! auto-vectorize where it can. Results are bit-identical to the scalar
//! paths.

use multiversion::multiversion;

use crate::color::{LabColor, RgbColor};
use crate::convert::rgb_to_lab_with;
use crate::distance::cie76;
use crate::math::LookupTables;

/// Convert `src` into `dst` element by element
///
/// Converts `min(src.len(), dst.len())` colors.
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn rgb_to_lab_batch(tables: &LookupTables, src: &[RgbColor], dst: &mut [LabColor]) {
    debug_assert_eq!(src.len(), dst.len());

    for (out, &rgb) in dst.iter_mut().zip(src) {
        *out = rgb_to_lab_with(tables, rgb);
    }
}

/// CIE76 distances from `target` to every candidate
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn cie76_row(target: LabColor, candidates: &[LabColor], out: &mut [f64]) {
    debug_assert!(out.len() >= candidates.len());

    for (cell, &candidate) in out.iter_mut().zip(candidates) {
        *cell = cie76(target, candidate);
    }
}
