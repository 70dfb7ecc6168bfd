//! Loosely-typed color input and the all-representations bundle

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{HexColor, HslColor, LabColor, RgbColor, XyzColor, named};
use crate::{Error, Result};

/// Any input the converter knows how to interpret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ColorInput {
    /// `#RGB` / `#RRGGBB`, `#` optional
    Hex(String),
    /// Already-validated channels
    Rgb(RgbColor),
    /// Entry of the named color table
    Named(String),
}

impl ColorInput {
    /// Classify a raw string
    ///
    /// Strings starting with `#`, or consisting only of 3 or 6 hex digits,
    /// are hex; anything else is treated as a color name.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidHex(input.to_owned()));
        }
        let looks_hex = trimmed.starts_with('#')
            || (matches!(trimmed.len(), 3 | 6) && trimmed.bytes().all(|c| c.is_ascii_hexdigit()));
        if looks_hex {
            Ok(Self::Hex(trimmed.to_owned()))
        } else {
            Ok(Self::Named(trimmed.to_owned()))
        }
    }

    /// Resolve to 8-bit sRGB
    pub fn resolve(&self) -> Result<RgbColor> {
        match self {
            Self::Hex(hex) => HexColor::parse(hex).map(|h| h.to_rgb()),
            Self::Rgb(rgb) => Ok(*rgb),
            Self::Named(name) => {
                named::lookup(name).ok_or_else(|| Error::UnknownColorName(name.clone()))
            }
        }
    }
}

impl FromStr for ColorInput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<RgbColor> for ColorInput {
    fn from(rgb: RgbColor) -> Self {
        Self::Rgb(rgb)
    }
}

/// Warm/cool impression of a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTemperature {
    Warm,
    Cool,
    Neutral,
}

/// Saturation (percent) below which a color reads as neutral
const NEUTRAL_SATURATION: f64 = 10.0;

impl ColorTemperature {
    /// Classify by HSL hue: reds through yellows and magenta-reds are warm,
    /// greens through violets are cool, near-grays are neutral.
    pub fn from_hsl(hsl: HslColor) -> Self {
        if hsl.s < NEUTRAL_SATURATION {
            Self::Neutral
        } else if hsl.h < 90.0 || hsl.h >= 300.0 {
            Self::Warm
        } else {
            Self::Cool
        }
    }
}

/// Every representation of one color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBundle {
    pub hex: HexColor,
    pub rgb: RgbColor,
    pub xyz: XyzColor,
    pub lab: LabColor,
    pub hsl: HslColor,
    pub temperature: ColorTemperature,
}
