//! Lower bounds relating each delta E formula to CIE76
//!
//! For a query `t` and any indexed color `x`,
//! `delta_e(t, x) >= scale * cie76(t, x)`. Walking candidates in increasing
//! CIE76 order, nothing further can beat a distance `d` once
//! `scale * cie76 > d`.

use crate::color::LabColor;
use crate::config::Cie94Params;
use crate::distance::DeltaEAlgorithm;

/// Relative slack absorbing rounding in the bound itself
pub(crate) const BOUND_SLACK: f64 = 1e-9;

/// Lightness range and chroma ceiling of an indexed set
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IndexBounds {
    pub l_min: f64,
    pub l_max: f64,
    pub max_chroma: f64,
}

impl IndexBounds {
    pub fn around<'a>(labs: impl IntoIterator<Item = &'a LabColor>) -> Option<Self> {
        labs.into_iter().fold(None, |acc, lab| {
            let chroma = lab.chroma();
            Some(match acc {
                None => Self {
                    l_min: lab.l,
                    l_max: lab.l,
                    max_chroma: chroma,
                },
                Some(b) => Self {
                    l_min: b.l_min.min(lab.l),
                    l_max: b.l_max.max(lab.l),
                    max_chroma: b.max_chroma.max(chroma),
                },
            })
        })
    }
}

/// `scale` such that `algorithm(target, x) >= scale * cie76(target, x)`
pub(crate) fn lower_bound_scale(
    algorithm: DeltaEAlgorithm,
    target: LabColor,
    bounds: &IndexBounds,
    cie94: &Cie94Params,
) -> f64 {
    match algorithm {
        DeltaEAlgorithm::Cie76 => 1.0,
        DeltaEAlgorithm::Cie94 => {
            // SL = 1; SC and SH depend only on the reference (target) chroma,
            // and ΔC² + ΔH² = Δa² + Δb²
            let c1 = target.chroma();
            let s_c = 1.0 + cie94.k1 * c1;
            let s_h = 1.0 + cie94.k2 * c1;
            (1.0 / cie94.k_l)
                .min(1.0 / (cie94.k_c * s_c))
                .min(1.0 / (cie94.k_h * s_h))
        }
        DeltaEAlgorithm::Ciede2000 => {
            // SL grows with |L̄ - 50|; L̄ lies between the target and the
            // indexed lightness range
            let lo = (target.l + bounds.l_min) / 2.0 - 50.0;
            let hi = (target.l + bounds.l_max) / 2.0 - 50.0;
            let dev = lo.abs().max(hi.abs());
            let s_l_max = 1.0 + 0.015 * dev * dev / (20.0 + dev * dev).sqrt();

            // C' <= 1.5 C since G <= 0.5, and SH <= SC because T < 1.95
            let s_c_max = 1.0 + 0.045 * 0.75 * (target.chroma() + bounds.max_chroma);

            // |RT| <= √3 leaves at least (1 - √3/2) of the chroma/hue terms
            let rt_floor = (1.0 - 3.0_f64.sqrt() / 2.0).sqrt();
            (1.0 / s_l_max).min(rt_floor / s_c_max)
        }
    }
}
