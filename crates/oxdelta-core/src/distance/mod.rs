//! Perceptual color difference
//!
//! Three standards are implemented over LAB triples:
//!
//! - **CIE76**: Euclidean distance. A true metric.
//! - **CIE94**: weighted by the chroma of the *first* color, so
//!   `cie94(a, b)` and `cie94(b, a)` generally differ.
//! - **CIEDE2000**: the current industry standard. It has no proven triangle
//!   inequality, so structures that prune by metric-space bounds must not be
//!   built on it directly (see [`crate::spatial`]).
//!
//! A difference of about 1.0 under CIEDE2000 is the just-noticeable
//! difference for a trained observer.

mod harmony;
mod matrix;
mod perceptual;
mod stats;

pub use harmony::{HarmonyScheme, PaletteHarmonyResult, calculate_harmony_score};
pub use matrix::{batch_calculate_distances, distance_matrix};
pub use perceptual::{BestMatch, DifferenceLevel, PerceptualDifference, get_perceptual_difference};
pub use stats::DeltaEStats;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::LabColor;
use crate::config::Cie94Params;
use crate::{Error, Result};

/// 25^7, the chroma pivot shared by G and RC
const POW25_7: f64 = 6_103_515_625.0;

/// Color difference formula selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaEAlgorithm {
    Cie76,
    Cie94,
    #[default]
    Ciede2000,
}

impl DeltaEAlgorithm {
    pub const ALL: [Self; 3] = [Self::Cie76, Self::Cie94, Self::Ciede2000];

    /// Whether the formula satisfies the metric axioms
    pub fn is_metric(self) -> bool {
        matches!(self, Self::Cie76)
    }

    /// Difference between two colors; CIE94 uses the default weights
    #[inline]
    pub fn distance(self, lab1: LabColor, lab2: LabColor) -> f64 {
        self.distance_with(lab1, lab2, &Cie94Params::default())
    }

    /// Difference between two colors with explicit CIE94 weights
    #[inline]
    pub fn distance_with(self, lab1: LabColor, lab2: LabColor, cie94: &Cie94Params) -> f64 {
        match self {
            Self::Cie76 => cie76(lab1, lab2),
            Self::Cie94 => cie94_with(lab1, lab2, cie94),
            Self::Ciede2000 => ciede2000(lab1, lab2),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cie76 => "cie76",
            Self::Cie94 => "cie94",
            Self::Ciede2000 => "ciede2000",
        }
    }
}

impl fmt::Display for DeltaEAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeltaEAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cie76" => Ok(Self::Cie76),
            "cie94" => Ok(Self::Cie94),
            "ciede2000" | "cie2000" => Ok(Self::Ciede2000),
            other => Err(Error::InvalidConfig(format!("unknown delta E algorithm {other:?}"))),
        }
    }
}

/// Formula dispatcher carrying the CIE94 weights
///
/// Exists so call sites that repeatedly compare colors under one
/// configuration do not thread the weights through every call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistanceCalculator {
    cie94: Cie94Params,
}

impl DistanceCalculator {
    pub fn new(cie94: Cie94Params) -> Self {
        Self { cie94 }
    }

    pub fn cie94_params(&self) -> &Cie94Params {
        &self.cie94
    }

    /// Difference of `lab2` from `lab1` (the reference) under `algorithm`
    #[inline]
    pub fn delta_e(&self, algorithm: DeltaEAlgorithm, lab1: LabColor, lab2: LabColor) -> f64 {
        algorithm.distance_with(lab1, lab2, &self.cie94)
    }

    /// Linear scan for the candidate closest to `target`
    ///
    /// Ties resolve to the lowest index. Returns `None` for an empty slice.
    pub fn find_closest_color(
        &self,
        target: LabColor,
        candidates: &[LabColor],
        algorithm: DeltaEAlgorithm,
    ) -> Option<BestMatch> {
        let mut best: Option<(usize, f64)> = None;
        for (index, &candidate) in candidates.iter().enumerate() {
            let distance = self.delta_e(algorithm, target, candidate);
            // NaN never compares less, so non-finite candidates are skipped
            let better = match best {
                None => !distance.is_nan(),
                Some((_, best_distance)) => distance < best_distance,
            };
            if better {
                best = Some((index, distance));
            }
        }
        best.map(|(index, distance)| BestMatch {
            index,
            distance,
            difference: get_perceptual_difference(distance),
        })
    }

    /// Full N×N matrix; see [`batch_calculate_distances`]
    pub fn batch_calculate_distances(
        &self,
        colors: &[LabColor],
        algorithm: DeltaEAlgorithm,
    ) -> Vec<Vec<f64>> {
        batch_calculate_distances(colors, algorithm, &self.cie94)
    }

    /// N×M matrix; see [`distance_matrix`]
    pub fn distance_matrix(
        &self,
        rows: &[LabColor],
        cols: &[LabColor],
        algorithm: DeltaEAlgorithm,
    ) -> Vec<Vec<f64>> {
        distance_matrix(rows, cols, algorithm, &self.cie94)
    }
}

/// CIE76: Euclidean distance in LAB
#[inline]
pub fn cie76(lab1: LabColor, lab2: LabColor) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// CIE94 with graphic-arts weights
///
/// Not symmetric: chroma weighting uses `lab1` as the reference.
#[inline]
pub fn cie94(lab1: LabColor, lab2: LabColor) -> f64 {
    cie94_with(lab1, lab2, &Cie94Params::default())
}

/// CIE94 with explicit weights
pub fn cie94_with(lab1: LabColor, lab2: LabColor, params: &Cie94Params) -> f64 {
    let c1 = lab1.chroma();
    let c2 = lab2.chroma();

    let delta_l = lab1.l - lab2.l;
    let delta_c = c1 - c2;
    let delta_a = lab1.a - lab2.a;
    let delta_b = lab1.b - lab2.b;

    // Mathematically non-negative; rounding can leave a tiny negative
    let delta_h = (delta_a * delta_a + delta_b * delta_b - delta_c * delta_c)
        .abs()
        .sqrt();

    let s_l = 1.0;
    let s_c = 1.0 + params.k1 * c1;
    let s_h = 1.0 + params.k2 * c1;

    let term_l = delta_l / (params.k_l * s_l);
    let term_c = delta_c / (params.k_c * s_c);
    let term_h = delta_h / (params.k_h * s_h);

    (term_l * term_l + term_c * term_c + term_h * term_h).sqrt()
}

#[inline]
fn hue_prime(b: f64, a_prime: f64) -> f64 {
    if a_prime == 0.0 && b == 0.0 {
        0.0
    } else {
        let h = b.atan2(a_prime).to_degrees();
        if h < 0.0 { h + 360.0 } else { h }
    }
}

/// CIEDE2000 color difference (kL = kC = kH = 1)
///
/// Reference: Sharma, Wu, Dalal, "The CIEDE2000 Color-Difference Formula:
/// Implementation Notes, Supplementary Test Data, and Mathematical
/// Observations" (2005).
pub fn ciede2000(lab1: LabColor, lab2: LabColor) -> f64 {
    let LabColor { l: l1, a: a1, b: b1 } = lab1;
    let LabColor { l: l2, a: a2, b: b2 } = lab2;

    // Step 1: C', h'
    let c1 = (a1 * a1 + b1 * b1).sqrt();
    let c2 = (a2 * a2 + b2 * b2).sqrt();
    let c_bar = (c1 + c2) / 2.0;

    let c_bar_7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar_7 / (c_bar_7 + POW25_7)).sqrt());

    let a1_prime = a1 * (1.0 + g);
    let a2_prime = a2 * (1.0 + g);

    let c1_prime = (a1_prime * a1_prime + b1 * b1).sqrt();
    let c2_prime = (a2_prime * a2_prime + b2 * b2).sqrt();

    let h1_prime = hue_prime(b1, a1_prime);
    let h2_prime = hue_prime(b2, a2_prime);

    // Step 2: ΔL', ΔC', ΔH'
    let delta_l_prime = l2 - l1;
    let delta_c_prime = c2_prime - c1_prime;

    let chroma_product = c1_prime * c2_prime;
    let delta_h_prime = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2_prime - h1_prime;
        if diff.abs() <= 180.0 {
            diff
        } else if diff > 180.0 {
            diff - 360.0
        } else {
            diff + 360.0
        }
    };

    let delta_big_h_prime =
        2.0 * chroma_product.sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    // Step 3: weighting functions
    let l_bar_prime = (l1 + l2) / 2.0;
    let c_bar_prime = (c1_prime + c2_prime) / 2.0;

    // Mean hue must be taken on the short arc
    let h_bar_prime = if chroma_product == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= 180.0 {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < 360.0 {
        (h1_prime + h2_prime + 360.0) / 2.0
    } else {
        (h1_prime + h2_prime - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_prime - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_prime).to_radians().cos()
        + 0.32 * (3.0 * h_bar_prime + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_prime - 63.0).to_radians().cos();

    let delta_theta = 30.0 * (-((h_bar_prime - 275.0) / 25.0).powi(2)).exp();
    let c_bar_prime_7 = c_bar_prime.powi(7);
    let r_c = 2.0 * (c_bar_prime_7 / (c_bar_prime_7 + POW25_7)).sqrt();

    let l_offset_sq = (l_bar_prime - 50.0).powi(2);
    let s_l = 1.0 + (0.015 * l_offset_sq) / (20.0 + l_offset_sq).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_prime;
    let s_h = 1.0 + 0.015 * c_bar_prime * t;
    let r_t = -(2.0 * delta_theta).to_radians().sin() * r_c;

    let term_l = delta_l_prime / s_l;
    let term_c = delta_c_prime / s_c;
    let term_h = delta_big_h_prime / s_h;

    (term_l * term_l + term_c * term_c + term_h * term_h + r_t * term_c * term_h)
        .max(0.0)
        .sqrt()
}
