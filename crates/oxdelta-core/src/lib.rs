//! # oxdelta - perceptual color distance and conversion
//!
//! Converts between sRGB, CIE XYZ, CIELAB and HSL through precomputed
//! lookup tables and a bounded conversion cache, measures perceptual
//! difference under CIE76, CIE94 and CIEDE2000, and answers
//! nearest-neighbor queries over fixed color sets.
//!
//! ## Quick Start
//!
//! ```
//! use oxdelta_core::{ColorSpaceConverter, DeltaEAlgorithm, DistanceCalculator};
//!
//! let converter = ColorSpaceConverter::new();
//! let orange = converter.hex_to_lab("#FF6B35").unwrap();
//! let coral = converter.hex_to_lab("#FF7F50").unwrap();
//!
//! let calculator = DistanceCalculator::default();
//! let delta_e = calculator.delta_e(DeltaEAlgorithm::Ciede2000, orange, coral);
//! assert!(delta_e > 0.0);
//! ```
//!
//! ## Layout
//!
//! - [`math`]: lookup tables, 3×3 matrices, interpolation
//! - [`color`]: value types
//! - [`convert`]: [`ColorSpaceConverter`] and input normalization
//! - [`cache`]: the [`ConversionCache`] abstraction and its LRU implementation
//! - [`distance`]: delta E formulas, perceptual bands, harmony, matrices
//! - [`spatial`]: [`SpatialIndex`]
//!
//! Diagnostics are emitted through `tracing`; no subscriber is installed.

pub mod cache;
pub mod color;
pub mod config;
pub mod convert;
pub mod distance;
pub mod error;
pub mod math;
mod simd;
pub mod spatial;

pub use cache::{CacheStats, ConversionCache, LruConversionCache, NoopCache};
pub use color::{HexColor, HslColor, LabColor, RgbColor, XyzColor};
pub use config::{Cie94Params, EngineConfig, IndexConfig};
pub use convert::{ColorBundle, ColorInput, ColorSpaceConverter, ColorTemperature};
pub use distance::{
    BestMatch, DeltaEAlgorithm, DistanceCalculator, PaletteHarmonyResult, PerceptualDifference,
};
pub use error::{Error, Result};
pub use spatial::{IndexedColor, Neighbor, SpatialIndex, SpatialIndexBuilder};

/// Version of oxdelta
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
