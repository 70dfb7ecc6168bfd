//! Numerical building blocks for conversions
//!
//! - Precomputed gamma and LAB companding tables
//! - 3x3 matrix operations for RGB↔XYZ transforms
//! - Interpolation for table lookups

pub mod interpolation;
pub mod lut;
pub mod matrix;

pub use interpolation::{lerp, lookup_unit_table};
pub use lut::{LookupTables, lab_f, lab_f_inv, srgb_gamma_decode, srgb_gamma_encode};
pub use matrix::{Matrix3x3, SRGB_TO_XYZ, XYZ_TO_SRGB};
