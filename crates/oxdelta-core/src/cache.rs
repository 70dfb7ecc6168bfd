//! Conversion cache
//!
//! A capacity-bounded LRU store keyed by conversion kind plus the exact
//! input values. There is no time-based expiry; entries leave only under
//! capacity pressure or on `clear`.
//!
//! # Example
//! ```
//! use oxdelta_core::cache::{CacheKey, CachedValue, ConversionCache, ConversionKind, LruConversionCache};
//! use oxdelta_core::{LabColor, RgbColor};
//!
//! let cache = LruConversionCache::new(2);
//! let key = CacheKey::from_rgb(ConversionKind::RgbToLab, RgbColor::new(1, 2, 3));
//! assert!(cache.get(&key).is_none());
//!
//! cache.put(key, CachedValue::Lab(LabColor::new(1.0, 0.0, 0.0)));
//! assert!(cache.get(&key).is_some());
//!
//! let stats = cache.stats();
//! assert_eq!((stats.hits, stats.misses), (1, 1));
//! ```

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

use crate::color::{HslColor, LabColor, RgbColor, XyzColor};

/// Which conversion produced a cached value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConversionKind {
    RgbToXyz,
    XyzToLab,
    RgbToLab,
    RgbToHsl,
    HslToRgb,
    LabToXyz,
    XyzToRgb,
}

/// Deterministic cache key: conversion kind plus bit-exact inputs
///
/// Float inputs are keyed by their bit pattern (with -0.0 folded into 0.0),
/// so two keys are equal only when the conversion would see identical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: ConversionKind,
    inputs: [u64; 3],
}

impl CacheKey {
    /// Key for a conversion taking an 8-bit color
    #[inline]
    pub fn from_rgb(kind: ConversionKind, rgb: RgbColor) -> Self {
        Self {
            kind,
            inputs: [rgb.r as u64, rgb.g as u64, rgb.b as u64],
        }
    }

    /// Key for a conversion taking three floats
    #[inline]
    pub fn from_floats(kind: ConversionKind, values: [f64; 3]) -> Self {
        Self {
            kind,
            inputs: values.map(|v| (v + 0.0).to_bits()),
        }
    }

    /// The conversion this key belongs to
    #[inline]
    pub fn kind(&self) -> ConversionKind {
        self.kind
    }
}

/// A cached conversion result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachedValue {
    Rgb(RgbColor),
    Xyz(XyzColor),
    Lab(LabColor),
    Hsl(HslColor),
}

impl CachedValue {
    pub fn as_rgb(&self) -> Option<RgbColor> {
        match *self {
            Self::Rgb(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_xyz(&self) -> Option<XyzColor> {
        match *self {
            Self::Xyz(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_lab(&self) -> Option<LabColor> {
        match *self {
            Self::Lab(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_hsl(&self) -> Option<HslColor> {
        match *self {
            Self::Hsl(v) => Some(v),
            _ => None,
        }
    }
}

/// Statistics about cache performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Entries removed to make room
    pub evictions: u64,
    /// Current number of entries
    pub size: usize,
    /// Maximum capacity
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Store consulted by the converter before computing
///
/// A cache never changes what a conversion returns: a miss, a wrong-typed
/// entry, or a dropped insert only costs a recomputation.
pub trait ConversionCache: Send + Sync + fmt::Debug {
    /// Look up a value and mark it most recently used
    fn get(&self, key: &CacheKey) -> Option<CachedValue>;

    /// Insert a value, evicting the least recently used entry if full
    fn put(&self, key: CacheKey, value: CachedValue);

    /// Current number of entries
    fn len(&self) -> usize;

    /// Maximum number of entries
    fn capacity(&self) -> usize;

    /// Hit/miss counters and occupancy
    fn stats(&self) -> CacheStats;

    /// Drop every entry (counters are kept)
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe LRU cache
///
/// Recency bookkeeping and eviction happen under one lock, so concurrent
/// inserts can never push the size past capacity.
pub struct LruConversionCache {
    entries: Mutex<LruCache<CacheKey, CachedValue>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl LruConversionCache {
    /// Create a cache holding at most `capacity` entries
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Whether a key is present, without touching recency
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains(key)
    }

    /// Peek at a value without updating recency or counters
    pub fn peek(&self, key: &CacheKey) -> Option<CachedValue> {
        self.entries.lock().peek(key).copied()
    }

    /// Reset hit/miss/eviction counters
    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

impl ConversionCache for LruConversionCache {
    fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let found = self.entries.lock().get(key).copied();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn put(&self, key: CacheKey, value: CachedValue) {
        let displaced = self.entries.lock().push(key, value);
        match displaced {
            Some((old_key, _)) if old_key != key => {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(kind = ?old_key.kind(), "evicted least recently used conversion");
            }
            _ => {}
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    fn stats(&self) -> CacheStats {
        let (size, capacity) = {
            let entries = self.entries.lock();
            (entries.len(), entries.cap().get())
        };
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size,
            capacity,
        }
    }

    fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl fmt::Debug for LruConversionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruConversionCache")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Cache that stores nothing; every lookup is a miss
#[derive(Debug, Default)]
pub struct NoopCache {
    misses: AtomicU64,
}

impl NoopCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversionCache for NoopCache {
    fn get(&self, _key: &CacheKey) -> Option<CachedValue> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn put(&self, _key: CacheKey, _value: CachedValue) {}

    fn len(&self) -> usize {
        0
    }

    fn capacity(&self) -> usize {
        0
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            misses: self.misses.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }

    fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: u8) -> CacheKey {
        CacheKey::from_rgb(ConversionKind::RgbToLab, RgbColor::new(i, 0, 0))
    }

    fn value(i: u8) -> CachedValue {
        CachedValue::Lab(LabColor::new(i as f64, 0.0, 0.0))
    }

    #[test]
    fn test_get_after_put() {
        let cache = LruConversionCache::new(4);
        cache.put(key(1), value(1));
        assert_eq!(cache.get(&key(1)), Some(value(1)));
        assert_eq!(cache.get(&key(2)), None);
    }

    #[test]
    fn test_size_bounded_by_capacity() {
        let cache = LruConversionCache::new(10);
        for i in 0..50 {
            cache.put(key(i), value(i));
        }
        assert_eq!(cache.len(), 10);
        assert_eq!(cache.stats().evictions, 40);
        for i in 40..50 {
            assert!(cache.contains(&key(i)));
        }
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = LruConversionCache::new(3);
        cache.put(key(1), value(1));
        cache.put(key(2), value(2));
        cache.put(key(3), value(3));

        // Touch 1 so that 2 becomes the oldest
        assert!(cache.get(&key(1)).is_some());
        cache.put(key(4), value(4));

        assert!(cache.contains(&key(1)));
        assert!(!cache.contains(&key(2)));
        assert!(cache.contains(&key(3)));
        assert!(cache.contains(&key(4)));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_one_eviction_per_insert() {
        let cache = LruConversionCache::new(2);
        cache.put(key(1), value(1));
        cache.put(key(2), value(2));
        cache.put(key(3), value(3));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_overwrite_is_not_eviction() {
        let cache = LruConversionCache::new(2);
        cache.put(key(1), value(1));
        cache.put(key(1), value(9));
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.peek(&key(1)), Some(value(9)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stats_and_hit_rate() {
        let cache = LruConversionCache::new(8);
        assert_eq!(cache.stats().hit_rate(), 0.0);
        cache.put(key(1), value(1));
        cache.get(&key(1));
        cache.get(&key(1));
        cache.get(&key(1));
        cache.get(&key(2));
        let stats = cache.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.75).abs() < 1e-12);
        assert_eq!(stats.capacity, 8);
        assert_eq!(stats.size, 1);

        cache.reset_stats();
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_peek_does_not_touch_recency() {
        let cache = LruConversionCache::new(2);
        cache.put(key(1), value(1));
        cache.put(key(2), value(2));
        assert!(cache.peek(&key(1)).is_some());
        cache.put(key(3), value(3));
        assert!(!cache.contains(&key(1)));
    }

    #[test]
    fn test_zero_capacity_becomes_one() {
        let cache = LruConversionCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.put(key(1), value(1));
        cache.put(key(2), value(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = LruConversionCache::new(4);
        cache.put(key(1), value(1));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_float_keys_fold_negative_zero() {
        let a = CacheKey::from_floats(ConversionKind::XyzToLab, [0.0, 1.0, 2.0]);
        let b = CacheKey::from_floats(ConversionKind::XyzToLab, [-0.0, 1.0, 2.0]);
        let c = CacheKey::from_floats(ConversionKind::LabToXyz, [0.0, 1.0, 2.0]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_noop_cache_never_stores() {
        let cache = NoopCache::new();
        cache.put(key(1), value(1));
        assert!(cache.get(&key(1)).is_none());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_value_accessors() {
        assert!(value(1).as_lab().is_some());
        assert!(value(1).as_rgb().is_none());
        assert!(CachedValue::Hsl(HslColor::default()).as_hsl().is_some());
        assert!(CachedValue::Xyz(XyzColor::default()).as_xyz().is_some());
    }
}
