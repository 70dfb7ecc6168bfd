//! Interpolation helpers for table lookups

/// Linear interpolation between two values
///
/// Returns a + t * (b - a) for t in [0, 1]
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Sample a uniformly spaced table covering [0, 1]
///
/// Inputs at or beyond either end return the boundary entry; inputs in
/// between interpolate linearly between the two bounding samples.
#[inline]
pub fn lookup_unit_table(table: &[f64], x: f64) -> f64 {
    debug_assert!(table.len() >= 2);
    let last = table.len() - 1;
    if !(x > 0.0) {
        return table[0];
    }
    if x >= 1.0 {
        return table[last];
    }

    let pos = x * last as f64;
    let i = (pos as usize).min(last - 1);
    let frac = pos - i as f64;
    lerp(table[i], table[i + 1], frac)
}
