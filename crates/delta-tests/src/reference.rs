//! Reference computations

use oxdelta_core::{DeltaEAlgorithm, LabColor, RgbColor, XyzColor};
use palette::white_point::D65;
use palette::{IntoColor, Lab, Srgb, Xyz};

/// LAB of an 8-bit sRGB color according to `palette`
pub fn palette_lab(rgb: RgbColor) -> LabColor {
    let srgb: Srgb<f64> = Srgb::new(rgb.r, rgb.g, rgb.b).into_format();
    let lab: Lab<D65, f64> = srgb.into_color();
    LabColor::new(lab.l, lab.a, lab.b)
}

/// XYZ (0–100 scale) of an 8-bit sRGB color according to `palette`
pub fn palette_xyz(rgb: RgbColor) -> XyzColor {
    let srgb: Srgb<f64> = Srgb::new(rgb.r, rgb.g, rgb.b).into_format();
    let xyz: Xyz<D65, f64> = srgb.into_color();
    XyzColor::new(xyz.x * 100.0, xyz.y * 100.0, xyz.z * 100.0)
}

/// Nearest 8-bit sRGB color for a LAB value according to `palette`
pub fn palette_rgb_from_lab(lab: LabColor) -> RgbColor {
    let lab: Lab<D65, f64> = Lab::new(lab.l, lab.a, lab.b);
    let srgb: Srgb<f64> = lab.into_color();
    let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RgbColor::new(channel(srgb.red), channel(srgb.green), channel(srgb.blue))
}

/// Every candidate as `(distance, position)`, sorted the way index
/// queries order their results
pub fn brute_force_ranking(
    target: LabColor,
    candidates: &[LabColor],
    algorithm: DeltaEAlgorithm,
) -> Vec<(f64, usize)> {
    let mut ranked: Vec<(f64, usize)> = candidates
        .iter()
        .enumerate()
        .map(|(position, &lab)| (algorithm.distance(target, lab), position))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    ranked
}
