//! sRGB and hex color primitives
//!
//! `RgbColor` is the 8-bit boundary type; `HexColor` is its canonical
//! string form (`#RRGGBB`, uppercase).

use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// 8-bit sRGB color
///
/// Laid out as three packed bytes so RGB8 buffers can be viewed as
/// `&[RgbColor]` without copying.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct RgbColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl RgbColor {
    /// Create a new RGB color
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from wide integers, rejecting anything outside [0, 255]
    pub fn try_new(r: i64, g: i64, b: i64) -> Result<Self> {
        let channel = |name: char, value: i64| {
            u8::try_from(value).map_err(|_| Error::ChannelOutOfRange {
                channel: name,
                value,
            })
        };
        Ok(Self {
            r: channel('r', r)?,
            g: channel('g', g)?,
            b: channel('b', b)?,
        })
    }

    /// Create from floating-point channels, clamping to [0, 255] and rounding
    #[inline]
    pub fn clamped(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Convert to array
    #[inline]
    pub const fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Canonical hex form
    pub fn to_hex(&self) -> HexColor {
        HexColor(format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b))
    }

    /// Black color
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White color
    pub const WHITE: Self = Self::new(255, 255, 255);
}

#[inline]
fn clamp_channel(v: f64) -> u8 {
    // NaN saturates to 0 in the cast
    v.round().clamp(0.0, 255.0) as u8
}

impl From<[u8; 3]> for RgbColor {
    fn from(arr: [u8; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl From<RgbColor> for [u8; 3] {
    fn from(rgb: RgbColor) -> Self {
        rgb.to_array()
    }
}

/// Canonical `#RRGGBB` color string
///
/// Parsing accepts 3 or 6 hex digits, an optional leading `#`, and either
/// case. The stored form is always 7 characters, uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a hex color string
    pub fn parse(input: &str) -> Result<Self> {
        parse_hex_digits(input).map(|rgb| rgb.to_hex())
    }

    /// The canonical string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode to RGB
    pub fn to_rgb(&self) -> RgbColor {
        // Canonical strings always decode
        parse_hex_digits(&self.0).unwrap_or_default()
    }
}

fn parse_hex_digits(input: &str) -> Result<RgbColor> {
    let invalid = || Error::InvalidHex(input.to_owned());
    let digits = input.strip_prefix('#').unwrap_or(input);
    if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let nibble = |c: u8| (c as char).to_digit(16).map(|d| d as u8).ok_or_else(invalid);
    let bytes = digits.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])?;
            let g = nibble(bytes[1])?;
            let b = nibble(bytes[2])?;
            Ok(RgbColor::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let byte = |i: usize| Ok::<u8, Error>(nibble(bytes[i])? << 4 | nibble(bytes[i + 1])?);
            Ok(RgbColor::new(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => Err(invalid()),
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<HexColor> for String {
    fn from(hex: HexColor) -> Self {
        hex.0
    }
}

impl From<RgbColor> for HexColor {
    fn from(rgb: RgbColor) -> Self {
        rgb.to_hex()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digits() {
        let hex = HexColor::parse("#ff6b35").unwrap();
        assert_eq!(hex.as_str(), "#FF6B35");
        assert_eq!(hex.to_rgb(), RgbColor::new(255, 107, 53));
    }

    #[test]
    fn test_parse_without_hash() {
        let hex: HexColor = "00aAfF".parse().unwrap();
        assert_eq!(hex.as_str(), "#00AAFF");
    }

    #[test]
    fn test_parse_three_digits() {
        let hex = HexColor::parse("#F0a").unwrap();
        assert_eq!(hex.as_str(), "#FF00AA");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "#", "#12345", "#1234567", "#GGGGGG", "12 456", "#ff6b3", "+ff6b35", "##fff"]
        {
            assert!(
                matches!(HexColor::parse(bad), Err(Error::InvalidHex(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_multibyte() {
        assert!(HexColor::parse("#ffé").is_err());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert_eq!(RgbColor::try_new(1, 2, 3).unwrap(), RgbColor::new(1, 2, 3));
        let err = RgbColor::try_new(0, 256, 0).unwrap_err();
        assert!(matches!(err, Error::ChannelOutOfRange { channel: 'g', value: 256 }));
        assert!(RgbColor::try_new(-1, 0, 0).is_err());
    }

    #[test]
    fn test_clamped_rounds_and_clamps() {
        assert_eq!(RgbColor::clamped(-5.0, 127.5, 300.0), RgbColor::new(0, 128, 255));
        assert_eq!(RgbColor::clamped(f64::NAN, 0.4, 254.6), RgbColor::new(0, 0, 255));
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let hex = HexColor::parse("abc").unwrap();
        let json = serde_json::to_string(&hex).unwrap();
        assert_eq!(json, r##""#AABBCC""##);
        let back: HexColor = serde_json::from_str(r#""aabbcc""#).unwrap();
        assert_eq!(back, hex);
        assert!(serde_json::from_str::<HexColor>(r#""nothex""#).is_err());
    }

    #[test]
    fn test_bytemuck_layout() {
        let bytes = [1u8, 2, 3, 4, 5, 6];
        let colors: &[RgbColor] = bytemuck::cast_slice(&bytes);
        assert_eq!(colors, &[RgbColor::new(1, 2, 3), RgbColor::new(4, 5, 6)]);
    }
}
