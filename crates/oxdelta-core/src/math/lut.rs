//! Precomputed transfer-function tables
//!
//! Three tables are built once per process and shared:
//! - sRGB decode, one linear value per 8-bit code
//! - sRGB encode, sampled at the same 256 points of the linear domain
//! - the CIELAB companding function f(t), 1001 samples over [0, 1]
//!
//! Decoding an 8-bit channel is a plain array read. The encode and LAB
//! tables are sampled with linear interpolation between bounding entries.

use std::sync::OnceLock;

use crate::math::interpolation::lookup_unit_table;

/// Entries in the gamma tables (one per 8-bit code)
pub const GAMMA_TABLE_SIZE: usize = 256;

/// Entries in the LAB companding table (step 1/1000 over [0, 1])
pub const LAB_TABLE_SIZE: usize = 1001;

/// Threshold below which f(t) is linear
pub const LAB_EPSILON: f64 = 0.008856;

/// Slope of the linear segment of f(t)
pub const LAB_KAPPA_SLOPE: f64 = 7.787;

const LAB_OFFSET: f64 = 16.0 / 116.0;

/// sRGB decode (encoded → linear) for a value in [0, 1]
#[inline]
pub fn srgb_gamma_decode(encoded: f64) -> f64 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB encode (linear → encoded) for a value in [0, 1]
#[inline]
pub fn srgb_gamma_encode(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// CIELAB forward companding function, evaluated directly
#[inline]
pub fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA_SLOPE * t + LAB_OFFSET
    }
}

/// Inverse of [`lab_f`]
#[inline]
pub fn lab_f_inv(f: f64) -> f64 {
    let cubed = f * f * f;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        (f - LAB_OFFSET) / LAB_KAPPA_SLOPE
    }
}

/// The shared table set
#[derive(Debug, Clone)]
pub struct LookupTables {
    gamma: [f64; GAMMA_TABLE_SIZE],
    reverse_gamma: [f64; GAMMA_TABLE_SIZE],
    lab: [f64; LAB_TABLE_SIZE],
}

static TABLES: OnceLock<LookupTables> = OnceLock::new();

impl LookupTables {
    /// Build a fresh table set
    pub fn new() -> Self {
        let mut gamma = [0.0; GAMMA_TABLE_SIZE];
        let mut reverse_gamma = [0.0; GAMMA_TABLE_SIZE];
        for (i, (decoded, encoded)) in gamma.iter_mut().zip(reverse_gamma.iter_mut()).enumerate() {
            let v = i as f64 / (GAMMA_TABLE_SIZE - 1) as f64;
            *decoded = srgb_gamma_decode(v);
            *encoded = srgb_gamma_encode(v);
        }

        let mut lab = [0.0; LAB_TABLE_SIZE];
        for (i, entry) in lab.iter_mut().enumerate() {
            *entry = lab_f(i as f64 / (LAB_TABLE_SIZE - 1) as f64);
        }

        Self {
            gamma,
            reverse_gamma,
            lab,
        }
    }

    /// Process-wide tables, built on first use
    pub fn shared() -> &'static Self {
        TABLES.get_or_init(|| {
            tracing::debug!(
                gamma_entries = GAMMA_TABLE_SIZE,
                lab_entries = LAB_TABLE_SIZE,
                "initializing color lookup tables"
            );
            Self::new()
        })
    }

    /// Linear-light value of an 8-bit sRGB code
    #[inline]
    pub fn decode(&self, code: u8) -> f64 {
        self.gamma[code as usize]
    }

    /// sRGB-encoded value in [0, 1] of a linear value
    ///
    /// Linear inputs outside [0, 1] clamp to the table ends.
    #[inline]
    pub fn encode(&self, linear: f64) -> f64 {
        lookup_unit_table(&self.reverse_gamma, linear)
    }

    /// f(t) for XYZ → LAB, clamped to the [0, 1] table domain
    #[inline]
    pub fn lab_f(&self, t: f64) -> f64 {
        lookup_unit_table(&self.lab, t)
    }

    /// Raw decode table
    pub fn gamma_table(&self) -> &[f64; GAMMA_TABLE_SIZE] {
        &self.gamma
    }

    /// Raw encode table
    pub fn reverse_gamma_table(&self) -> &[f64; GAMMA_TABLE_SIZE] {
        &self.reverse_gamma
    }

    /// Raw LAB companding table
    pub fn lab_table(&self) -> &[f64; LAB_TABLE_SIZE] {
        &self.lab
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::new()
    }
}
