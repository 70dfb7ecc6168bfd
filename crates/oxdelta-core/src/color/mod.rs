//! Color value types
//!
//! This module provides:
//! - 8-bit sRGB and canonical hex strings
//! - CIE XYZ (0–100 scale)
//! - CIELAB (D65)
//! - HSL
//! - The D65 reference white and a named-color table
//!
//! All types are immutable values; conversions produce new values.

pub mod hsl;
pub mod lab;
pub mod named;
pub mod rgb;
pub mod white_point;
pub mod xyz;

pub use hsl::HslColor;
pub use lab::LabColor;
pub use rgb::{HexColor, RgbColor};
pub use white_point::{D65, WhitePoint};
pub use xyz::XyzColor;
