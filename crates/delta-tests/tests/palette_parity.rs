//! Conversion parity with the `palette` crate
//!
//! The lookup-table path interpolates f(t) between 1001 samples, so LAB
//! values agree to a few hundredths rather than bit for bit.

use delta_tests::{palette_lab, palette_rgb_from_lab, palette_xyz, random_lab_colors, random_rgb_colors};
use oxdelta_core::distance::{DeltaEStats, cie76};
use oxdelta_core::{ColorSpaceConverter, LabColor, RgbColor};

const SAMPLES: usize = 4000;

fn corners() -> Vec<RgbColor> {
    let mut out = Vec::new();
    for r in [0u8, 255] {
        for g in [0u8, 255] {
            for b in [0u8, 255] {
                out.push(RgbColor::new(r, g, b));
            }
        }
    }
    out
}

#[test]
fn test_lab_matches_palette() {
    let converter = ColorSpaceConverter::new();
    let mut colors = random_rgb_colors(0xC0FFEE, SAMPLES);
    colors.extend(corners());
    colors.extend((0..=255u8).map(|v| RgbColor::new(v, v, v)));

    let diffs: Vec<f64> = colors
        .iter()
        .map(|&rgb| cie76(converter.rgb_to_lab(rgb), palette_lab(rgb)))
        .collect();
    let stats = DeltaEStats::from_differences(&diffs).expect("finite differences");

    println!(
        "LAB vs palette over {} colors: mean {:.4}, p95 {:.4}, max {:.4}",
        stats.count, stats.mean, stats.p95, stats.max
    );
    assert!(stats.max < 0.1, "max LAB deviation {}", stats.max);
    assert!(stats.is_excellent());
}

#[test]
fn test_xyz_matches_palette() {
    let converter = ColorSpaceConverter::new();
    for rgb in random_rgb_colors(42, SAMPLES) {
        let ours = converter.rgb_to_xyz(rgb);
        let theirs = palette_xyz(rgb);
        assert!(ours.approx_eq(&theirs, 0.01), "{rgb:?}: {ours:?} vs {theirs:?}");
    }
}

#[test]
fn test_reverse_path_matches_palette() {
    let converter = ColorSpaceConverter::new();
    for rgb in random_rgb_colors(7, SAMPLES) {
        let lab = palette_lab(rgb);
        let ours = converter.lab_to_rgb(lab);
        let theirs = palette_rgb_from_lab(lab);
        for (x, y) in ours.to_array().into_iter().zip(theirs.to_array()) {
            assert!(x.abs_diff(y) <= 1, "{lab:?}: {ours:?} vs {theirs:?}");
        }
    }
}

#[test]
fn test_out_of_gamut_lab_clamps_like_palette() {
    let converter = ColorSpaceConverter::new();
    for lab in random_lab_colors(99, 500) {
        let ours = converter.lab_to_rgb(lab);
        let theirs = palette_rgb_from_lab(lab);
        for (x, y) in ours.to_array().into_iter().zip(theirs.to_array()) {
            assert!(x.abs_diff(y) <= 1, "{lab:?}: {ours:?} vs {theirs:?}");
        }
    }
}

#[test]
fn test_reference_fixture() {
    let converter = ColorSpaceConverter::new();
    let rgb = converter.hex_to_rgb("#FF6B35").expect("valid hex");
    assert_eq!(rgb, RgbColor::new(255, 107, 53));

    let ours = converter.rgb_to_lab(rgb);
    let theirs = palette_lab(rgb);
    assert!(ours.approx_eq(&theirs, 0.05), "{ours:?} vs {theirs:?}");
    assert!(ours.approx_eq(&LabColor::new(63.37, 53.67, 56.47), 0.5));
}
