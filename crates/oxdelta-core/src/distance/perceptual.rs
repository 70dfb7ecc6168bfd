//! Interpretation bands for delta E values

use serde::Serialize;

/// Discrete perceptual band for a color difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceLevel {
    Imperceptible,
    BarelyPerceptible,
    Perceptible,
    WellPerceptible,
    Significant,
    VerySignificant,
}

impl DifferenceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Imperceptible => "imperceptible",
            Self::BarelyPerceptible => "barely_perceptible",
            Self::Perceptible => "perceptible",
            Self::WellPerceptible => "well_perceptible",
            Self::Significant => "significant",
            Self::VerySignificant => "very_significant",
        }
    }
}

/// Human-oriented reading of a delta E value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerceptualDifference {
    pub level: DifferenceLevel,
    pub description: &'static str,
    /// Match quality as a short label
    pub rating: &'static str,
    /// Confidence in the classification, percent
    pub confidence: u8,
}

/// Upper bounds (exclusive) of each band except the last
const BANDS: [(f64, PerceptualDifference); 5] = [
    (
        1.0,
        PerceptualDifference {
            level: DifferenceLevel::Imperceptible,
            description: "Not perceptible by human eyes",
            rating: "excellent",
            confidence: 100,
        },
    ),
    (
        2.0,
        PerceptualDifference {
            level: DifferenceLevel::BarelyPerceptible,
            description: "Perceptible through close observation",
            rating: "very_good",
            confidence: 95,
        },
    ),
    (
        3.5,
        PerceptualDifference {
            level: DifferenceLevel::Perceptible,
            description: "Perceptible at a glance",
            rating: "good",
            confidence: 85,
        },
    ),
    (
        5.0,
        PerceptualDifference {
            level: DifferenceLevel::WellPerceptible,
            description: "Clearly perceptible difference",
            rating: "fair",
            confidence: 70,
        },
    ),
    (
        10.0,
        PerceptualDifference {
            level: DifferenceLevel::Significant,
            description: "Colors are more similar than opposite",
            rating: "poor",
            confidence: 50,
        },
    ),
];

const VERY_SIGNIFICANT: PerceptualDifference = PerceptualDifference {
    level: DifferenceLevel::VerySignificant,
    description: "Colors are clearly different",
    rating: "very_poor",
    confidence: 25,
};

/// Classify a delta E value
///
/// Bands are `[lower, upper)`. NaN falls into the last band.
pub fn get_perceptual_difference(delta_e: f64) -> PerceptualDifference {
    BANDS
        .iter()
        .find(|(upper, _)| delta_e < *upper)
        .map_or(VERY_SIGNIFICANT, |&(_, band)| band)
}

/// Result of a closest-color scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestMatch {
    /// Position in the candidate slice
    pub index: usize,
    pub distance: f64,
    pub difference: PerceptualDifference,
}
