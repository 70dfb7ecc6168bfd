//! Reference white
//!
//! LAB values in this crate are always relative to D65 on the 0–100 scale.

use crate::color::XyzColor;

/// A white point definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    /// Name of the illuminant
    pub name: &'static str,
    /// CIE XYZ coordinates (Y normalized to 100)
    pub xyz: XyzColor,
}

impl WhitePoint {
    /// Create a new white point
    pub const fn new(name: &'static str, x: f64, y: f64, z: f64) -> Self {
        Self {
            name,
            xyz: XyzColor::new(x, y, z),
        }
    }
}

/// CIE Standard Illuminant D65 (Noon Daylight)
///
/// Standard white point for sRGB.
pub const D65: WhitePoint = WhitePoint::new("D65", 95.047, 100.000, 108.883);
