//! Palette harmony scoring over pairwise CIEDE2000 distances

use serde::Serialize;

use super::ciede2000;
use crate::color::LabColor;

/// Mean pairwise distance below which a palette reads as analogous
const ANALOGOUS_LIMIT: f64 = 15.0;
/// Mean pairwise distance above which a palette reads as complementary
const COMPLEMENTARY_LIMIT: f64 = 50.0;

const BASE_SCORE: f64 = 80.0;
const MAX_CONSISTENCY_BONUS: f64 = 20.0;

/// Palette scheme inferred from its pairwise distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyScheme {
    Monochromatic,
    Analogous,
    Triadic,
    Complementary,
}

impl HarmonyScheme {
    fn classify(mean: f64) -> Self {
        if mean < ANALOGOUS_LIMIT {
            Self::Analogous
        } else if mean > COMPLEMENTARY_LIMIT {
            Self::Complementary
        } else {
            Self::Triadic
        }
    }

    /// Mean distance a well-formed palette of this scheme sits at
    fn ideal_distance(self) -> f64 {
        match self {
            Self::Monochromatic => 0.0,
            Self::Analogous => ANALOGOUS_LIMIT / 2.0,
            Self::Triadic => (ANALOGOUS_LIMIT + COMPLEMENTARY_LIMIT) / 2.0,
            Self::Complementary => 65.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaletteHarmonyResult {
    /// Overall score in `[0, 100]`
    pub score: f64,
    pub scheme: HarmonyScheme,
    pub average_distance: f64,
    /// Population variance of the pairwise distances
    pub variance: f64,
    /// Consistency bonus awarded, `max(0, 20 - variance)`
    pub consistency: f64,
}

/// Score how well a palette hangs together
///
/// A single color is a perfect monochromatic palette; an empty palette
/// scores zero.
pub fn calculate_harmony_score(colors: &[LabColor]) -> PaletteHarmonyResult {
    match colors.len() {
        0 => PaletteHarmonyResult {
            score: 0.0,
            scheme: HarmonyScheme::Monochromatic,
            average_distance: 0.0,
            variance: 0.0,
            consistency: 0.0,
        },
        1 => PaletteHarmonyResult {
            score: 100.0,
            scheme: HarmonyScheme::Monochromatic,
            average_distance: 0.0,
            variance: 0.0,
            consistency: MAX_CONSISTENCY_BONUS,
        },
        n => {
            let mut distances = Vec::with_capacity(n * (n - 1) / 2);
            for (i, &a) in colors.iter().enumerate() {
                for &b in &colors[i + 1..] {
                    distances.push(ciede2000(a, b));
                }
            }

            let count = distances.len() as f64;
            let mean = distances.iter().sum::<f64>() / count;
            let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / count;

            let scheme = HarmonyScheme::classify(mean);
            let base = (BASE_SCORE - (mean - scheme.ideal_distance()).abs() * 2.0).max(0.0);
            let consistency = (MAX_CONSISTENCY_BONUS - variance).max(0.0);
            let score = (base + consistency).clamp(0.0, 100.0);

            PaletteHarmonyResult {
                score: if score.is_nan() { 0.0 } else { score },
                scheme,
                average_distance: mean,
                variance,
                consistency,
            }
        }
    }
}
