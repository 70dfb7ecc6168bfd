//! Dense distance matrices

use rayon::prelude::*;

use super::DeltaEAlgorithm;
use crate::color::LabColor;
use crate::config::Cie94Params;
use crate::simd;

/// N×N matrix of `algorithm(colors[i], colors[j])`
///
/// Every cell is computed; CIE94 rows are not mirrored because the formula
/// is asymmetric.
pub fn batch_calculate_distances(
    colors: &[LabColor],
    algorithm: DeltaEAlgorithm,
    cie94: &Cie94Params,
) -> Vec<Vec<f64>> {
    distance_matrix(colors, colors, algorithm, cie94)
}

/// N×M matrix of `algorithm(rows[i], cols[j])`, rows computed in parallel
pub fn distance_matrix(
    rows: &[LabColor],
    cols: &[LabColor],
    algorithm: DeltaEAlgorithm,
    cie94: &Cie94Params,
) -> Vec<Vec<f64>> {
    rows.par_iter()
        .map(|&row| {
            let mut out = vec![0.0; cols.len()];
            match algorithm {
                DeltaEAlgorithm::Cie76 => simd::cie76_row(row, cols, &mut out),
                _ => {
                    for (cell, &col) in out.iter_mut().zip(cols) {
                        *cell = algorithm.distance_with(row, col, cie94);
                    }
                }
            }
            out
        })
        .collect()
}
