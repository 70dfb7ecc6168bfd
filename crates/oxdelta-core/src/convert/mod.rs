//! Color space conversion
//!
//! `ColorSpaceConverter` converts between sRGB, CIE XYZ (0–100), CIELAB
//! (D65) and HSL using the shared lookup tables. Every scalar conversion is
//! checked against the converter's cache first; a cached value is always
//! the value the uncached path would compute for the same input.

mod bundle;

pub use bundle::{ColorBundle, ColorInput, ColorTemperature};

use std::sync::Arc;

use rayon::prelude::*;

use crate::cache::{
    CacheKey, CacheStats, CachedValue, ConversionCache, ConversionKind, LruConversionCache,
    NoopCache,
};
use crate::color::{D65, HexColor, HslColor, LabColor, RgbColor, XyzColor};
use crate::config::EngineConfig;
use crate::math::{LookupTables, SRGB_TO_XYZ, XYZ_TO_SRGB, lab_f_inv};
use crate::{Error, Result, simd};

/// 8-bit sRGB → XYZ through the decode table
#[inline]
pub(crate) fn rgb_to_xyz_with(tables: &LookupTables, rgb: RgbColor) -> XyzColor {
    let linear = [tables.decode(rgb.r), tables.decode(rgb.g), tables.decode(rgb.b)];
    let [x, y, z] = SRGB_TO_XYZ.multiply_vec(linear);
    XyzColor::new(x * 100.0, y * 100.0, z * 100.0)
}

/// XYZ → LAB through the companding table
#[inline]
pub(crate) fn xyz_to_lab_with(tables: &LookupTables, xyz: XyzColor) -> LabColor {
    let white = D65.xyz;
    let fx = tables.lab_f(xyz.x / white.x);
    let fy = tables.lab_f(xyz.y / white.y);
    let fz = tables.lab_f(xyz.z / white.z);

    LabColor::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

#[inline]
pub(crate) fn rgb_to_lab_with(tables: &LookupTables, rgb: RgbColor) -> LabColor {
    xyz_to_lab_with(tables, rgb_to_xyz_with(tables, rgb))
}

fn lab_to_xyz_direct(lab: LabColor) -> XyzColor {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;
    let white = D65.xyz;

    XyzColor::new(
        lab_f_inv(fx) * white.x,
        lab_f_inv(fy) * white.y,
        lab_f_inv(fz) * white.z,
    )
}

fn xyz_to_rgb_with(tables: &LookupTables, xyz: XyzColor) -> RgbColor {
    let linear = XYZ_TO_SRGB.multiply_vec([xyz.x / 100.0, xyz.y / 100.0, xyz.z / 100.0]);
    RgbColor::clamped(
        tables.encode(linear[0]) * 255.0,
        tables.encode(linear[1]) * 255.0,
        tables.encode(linear[2]) * 255.0,
    )
}

/// Parse 3- or 6-digit hex, with or without `#`
///
/// Returns `None` for malformed input.
pub fn hex_to_rgb(hex: &str) -> Option<RgbColor> {
    HexColor::parse(hex).ok().map(|h| h.to_rgb())
}

/// Format channels as canonical hex, clamping to [0, 255] and rounding
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> HexColor {
    RgbColor::clamped(r, g, b).to_hex()
}

/// Converter between color representations
///
/// Cheap to clone; clones share the same cache.
#[derive(Debug, Clone)]
pub struct ColorSpaceConverter {
    tables: &'static LookupTables,
    cache: Arc<dyn ConversionCache>,
    parallel_threshold: usize,
}

impl Default for ColorSpaceConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSpaceConverter {
    /// Converter with the default configuration
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Converter sized from a configuration; capacity 0 disables caching
    pub fn from_config(config: &EngineConfig) -> Self {
        let cache: Arc<dyn ConversionCache> = if config.cache_capacity == 0 {
            Arc::new(NoopCache::new())
        } else {
            Arc::new(LruConversionCache::new(config.cache_capacity))
        };
        tracing::debug!(
            cache_capacity = config.cache_capacity,
            parallel_threshold = config.parallel_threshold,
            "created color space converter"
        );
        Self {
            tables: LookupTables::shared(),
            cache,
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Converter using a caller-supplied cache
    pub fn with_cache(cache: Arc<dyn ConversionCache>) -> Self {
        Self {
            tables: LookupTables::shared(),
            cache,
            parallel_threshold: EngineConfig::default().parallel_threshold,
        }
    }

    /// The cache consulted by scalar conversions
    pub fn cache(&self) -> &dyn ConversionCache {
        self.cache.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The lookup tables used by this converter
    pub fn tables(&self) -> &'static LookupTables {
        self.tables
    }

    fn cached<T>(
        &self,
        key: CacheKey,
        extract: fn(&CachedValue) -> Option<T>,
        wrap: fn(T) -> CachedValue,
        compute: impl FnOnce() -> T,
    ) -> T
    where
        T: Copy,
    {
        // A wrong-typed entry falls through to recomputation
        if let Some(value) = self.cache.get(&key).as_ref().and_then(extract) {
            return value;
        }
        let value = compute();
        self.cache.put(key, wrap(value));
        value
    }

    /// See [`hex_to_rgb`]
    pub fn hex_to_rgb(&self, hex: &str) -> Option<RgbColor> {
        hex_to_rgb(hex)
    }

    /// See [`rgb_to_hex`]
    pub fn rgb_to_hex(&self, r: f64, g: f64, b: f64) -> HexColor {
        rgb_to_hex(r, g, b)
    }

    /// sRGB → XYZ (0–100)
    pub fn rgb_to_xyz(&self, rgb: RgbColor) -> XyzColor {
        let key = CacheKey::from_rgb(ConversionKind::RgbToXyz, rgb);
        self.cached(key, CachedValue::as_xyz, CachedValue::Xyz, || {
            rgb_to_xyz_with(self.tables, rgb)
        })
    }

    /// XYZ (0–100) → LAB (D65)
    pub fn xyz_to_lab(&self, xyz: XyzColor) -> LabColor {
        let key = CacheKey::from_floats(ConversionKind::XyzToLab, xyz.to_array());
        self.cached(key, CachedValue::as_lab, CachedValue::Lab, || {
            xyz_to_lab_with(self.tables, xyz)
        })
    }

    /// sRGB → LAB
    pub fn rgb_to_lab(&self, rgb: RgbColor) -> LabColor {
        let key = CacheKey::from_rgb(ConversionKind::RgbToLab, rgb);
        self.cached(key, CachedValue::as_lab, CachedValue::Lab, || {
            rgb_to_lab_with(self.tables, rgb)
        })
    }

    /// Hex string → LAB, `None` for malformed hex
    pub fn hex_to_lab(&self, hex: &str) -> Option<LabColor> {
        self.hex_to_rgb(hex).map(|rgb| self.rgb_to_lab(rgb))
    }

    /// LAB → XYZ (0–100), exact inverse companding
    pub fn lab_to_xyz(&self, lab: LabColor) -> XyzColor {
        let key = CacheKey::from_floats(ConversionKind::LabToXyz, lab.to_array());
        self.cached(key, CachedValue::as_xyz, CachedValue::Xyz, || lab_to_xyz_direct(lab))
    }

    /// XYZ (0–100) → sRGB, out-of-gamut channels clamped
    pub fn xyz_to_rgb(&self, xyz: XyzColor) -> RgbColor {
        let key = CacheKey::from_floats(ConversionKind::XyzToRgb, xyz.to_array());
        self.cached(key, CachedValue::as_rgb, CachedValue::Rgb, || {
            xyz_to_rgb_with(self.tables, xyz)
        })
    }

    /// LAB → sRGB, out-of-gamut channels clamped
    pub fn lab_to_rgb(&self, lab: LabColor) -> RgbColor {
        self.xyz_to_rgb(self.lab_to_xyz(lab))
    }

    pub fn lab_to_hex(&self, lab: LabColor) -> HexColor {
        self.lab_to_rgb(lab).to_hex()
    }

    /// sRGB → HSL
    pub fn rgb_to_hsl(&self, rgb: RgbColor) -> HslColor {
        let key = CacheKey::from_rgb(ConversionKind::RgbToHsl, rgb);
        self.cached(key, CachedValue::as_hsl, CachedValue::Hsl, || HslColor::from_rgb(rgb))
    }

    /// HSL → sRGB
    pub fn hsl_to_rgb(&self, hsl: HslColor) -> RgbColor {
        let key = CacheKey::from_floats(ConversionKind::HslToRgb, [hsl.h, hsl.s, hsl.l]);
        self.cached(key, CachedValue::as_rgb, CachedValue::Rgb, || hsl.to_rgb())
    }

    /// Convert many colors to LAB, bypassing the cache
    ///
    /// Results are identical to calling [`rgb_to_lab`](Self::rgb_to_lab)
    /// per element, in input order. Large batches are split across the
    /// rayon pool.
    pub fn batch_rgb_to_lab(&self, colors: &[RgbColor]) -> Vec<LabColor> {
        let mut out = vec![LabColor::default(); colors.len()];
        if colors.len() < self.parallel_threshold.max(1) {
            simd::rgb_to_lab_batch(self.tables, colors, &mut out);
        } else {
            let chunk = self.parallel_threshold.max(1);
            out.par_chunks_mut(chunk)
                .zip(colors.par_chunks(chunk))
                .for_each(|(dst, src)| simd::rgb_to_lab_batch(self.tables, src, dst));
        }
        out
    }

    /// Convert a packed RGB8 buffer (`r, g, b, r, g, b, ...`) to LAB
    pub fn batch_rgb8_to_lab(&self, rgb8: &[u8]) -> Result<Vec<LabColor>> {
        let colors: &[RgbColor] =
            bytemuck::try_cast_slice(rgb8).map_err(|_| Error::BufferSize {
                expected: rgb8.len().div_ceil(3) * 3,
                actual: rgb8.len(),
            })?;
        Ok(self.batch_rgb_to_lab(colors))
    }

    /// Resolve any supported input into every representation at once
    ///
    /// Returns `None` when the input cannot be interpreted.
    pub fn validate_and_normalize(&self, input: &ColorInput) -> Option<ColorBundle> {
        let rgb = input.resolve().ok()?;
        let hsl = self.rgb_to_hsl(rgb);
        Some(ColorBundle {
            hex: rgb.to_hex(),
            rgb,
            xyz: self.rgb_to_xyz(rgb),
            lab: self.rgb_to_lab(rgb),
            hsl,
            temperature: ColorTemperature::from_hsl(hsl),
        })
    }

    /// [`validate_and_normalize`](Self::validate_and_normalize) for a raw string
    pub fn normalize_str(&self, input: &str) -> Option<ColorBundle> {
        self.validate_and_normalize(&ColorInput::parse(input).ok()?)
    }
}
