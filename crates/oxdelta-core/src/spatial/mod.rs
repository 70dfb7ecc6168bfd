//! Nearest-neighbor queries over a fixed color set
//!
//! A [`SpatialIndex`] is built once from a snapshot of colors and is
//! immutable afterwards; changing the set means building a new index.
//!
//! The tree partitions LAB space with Euclidean geometry regardless of the
//! formula a query asks for. Candidates are drawn in increasing CIE76
//! distance and scored with the requested formula; the walk stops only once
//! a per-query lower bound proves no remaining candidate can enter the
//! result. Query results are therefore identical to a brute-force scan with
//! [`DistanceCalculator::find_closest_color`], including tie order (lowest
//! insertion position wins).
//!
//! ```
//! use oxdelta_core::LabColor;
//! use oxdelta_core::distance::DeltaEAlgorithm;
//! use oxdelta_core::spatial::{IndexedColor, SpatialIndex};
//!
//! let index = SpatialIndex::build(vec![
//!     IndexedColor::new("ink", LabColor::new(12.0, 1.0, -3.0)),
//!     IndexedColor::new("paper", LabColor::new(96.0, 0.0, 2.0)),
//! ])?;
//!
//! let nearest = index
//!     .find_nearest_neighbor(LabColor::new(90.0, 0.0, 0.0), DeltaEAlgorithm::Ciede2000)
//!     .unwrap();
//! assert_eq!(nearest.color.id, "paper");
//! # Ok::<(), oxdelta_core::Error>(())
//! ```

mod bounds;
mod kdtree;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use self::bounds::{BOUND_SLACK, IndexBounds, lower_bound_scale};
use self::kdtree::{KdTree, Point};
use crate::color::LabColor;
use crate::config::{Cie94Params, EngineConfig, IndexConfig};
use crate::distance::{DeltaEAlgorithm, DistanceCalculator};
use crate::{Error, Result};

/// A caller identifier paired with its LAB coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedColor<T> {
    pub id: T,
    pub lab: LabColor,
}

impl<T> IndexedColor<T> {
    pub fn new(id: T, lab: LabColor) -> Self {
        Self { id, lab }
    }
}

impl<T> From<(T, LabColor)> for IndexedColor<T> {
    fn from((id, lab): (T, LabColor)) -> Self {
        Self::new(id, lab)
    }
}

/// One query hit
#[derive(Debug)]
pub struct Neighbor<'a, T> {
    pub color: &'a IndexedColor<T>,
    /// Insertion position of the color in the index
    pub position: usize,
    /// Distance from the query under the requested formula
    pub distance: f64,
}

impl<T> Clone for Neighbor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Neighbor<'_, T> {}

/// Unbuilt index: collects colors and settings
#[derive(Debug, Clone)]
pub struct SpatialIndexBuilder<T> {
    colors: Vec<IndexedColor<T>>,
    config: IndexConfig,
    cie94: Cie94Params,
}

impl<T> Default for SpatialIndexBuilder<T> {
    fn default() -> Self {
        Self {
            colors: Vec::new(),
            config: IndexConfig::default(),
            cie94: Cie94Params::default(),
        }
    }
}

impl<T> SpatialIndexBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the index and CIE94 settings from an engine config
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            colors: Vec::new(),
            config: config.index,
            cie94: config.cie94,
        }
    }

    pub fn leaf_size(mut self, leaf_size: usize) -> Self {
        self.config.leaf_size = leaf_size;
        self
    }

    pub fn cie94(mut self, params: Cie94Params) -> Self {
        self.cie94 = params;
        self
    }

    pub fn push(&mut self, id: T, lab: LabColor) {
        self.colors.push(IndexedColor::new(id, lab));
    }

    pub fn with_color(mut self, id: T, lab: LabColor) -> Self {
        self.push(id, lab);
        self
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Freeze the collected colors into a queryable index
    ///
    /// Fails on a zero leaf size, unusable CIE94 weights or any non-finite
    /// coordinate. An empty set
    /// builds an index that answers every query with nothing.
    pub fn build(self) -> Result<SpatialIndex<T>> {
        if self.config.leaf_size == 0 {
            return Err(Error::InvalidConfig("index.leaf_size must be at least 1".into()));
        }
        self.cie94.validate()?;
        if let Some(position) = self.colors.iter().position(|c| !c.lab.is_finite()) {
            return Err(Error::NonFiniteCoordinate { position });
        }

        let points = self
            .colors
            .iter()
            .enumerate()
            .map(|(position, c)| Point {
                lab: c.lab.to_array(),
                position,
            })
            .collect();
        let tree = KdTree::build(points, self.config.leaf_size);
        let bounds = IndexBounds::around(self.colors.iter().map(|c| &c.lab));

        tracing::debug!(
            colors = tree.len(),
            depth = tree.depth(),
            leaves = tree.leaf_count(),
            leaf_size = self.config.leaf_size,
            "spatial index built"
        );

        Ok(SpatialIndex {
            colors: self.colors,
            tree,
            bounds,
            calculator: DistanceCalculator::new(self.cie94),
        })
    }
}

impl<T> Extend<IndexedColor<T>> for SpatialIndexBuilder<T> {
    fn extend<I: IntoIterator<Item = IndexedColor<T>>>(&mut self, iter: I) {
        self.colors.extend(iter);
    }
}

impl<T> FromIterator<IndexedColor<T>> for SpatialIndexBuilder<T> {
    fn from_iter<I: IntoIterator<Item = IndexedColor<T>>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

#[derive(Debug, Clone, Copy)]
enum Limit {
    Nearest(usize),
    Radius(f64),
}

/// Built, immutable index
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    colors: Vec<IndexedColor<T>>,
    tree: KdTree,
    bounds: Option<IndexBounds>,
    calculator: DistanceCalculator,
}

impl<T> SpatialIndex<T> {
    pub fn builder() -> SpatialIndexBuilder<T> {
        SpatialIndexBuilder::new()
    }

    /// Build with default settings
    pub fn build(colors: impl IntoIterator<Item = IndexedColor<T>>) -> Result<Self> {
        colors.into_iter().collect::<SpatialIndexBuilder<T>>().build()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Indexed colors in insertion order
    pub fn colors(&self) -> &[IndexedColor<T>] {
        &self.colors
    }

    pub fn calculator(&self) -> &DistanceCalculator {
        &self.calculator
    }

    /// The closest indexed color to `target`
    ///
    /// `None` when the index is empty or `target` is not finite.
    pub fn find_nearest_neighbor(
        &self,
        target: LabColor,
        algorithm: DeltaEAlgorithm,
    ) -> Option<Neighbor<'_, T>> {
        self.query(target, algorithm, Limit::Nearest(1)).into_iter().next()
    }

    /// The `k` closest colors, nearest first
    ///
    /// Returns fewer than `k` when the index holds fewer colors.
    pub fn find_k_nearest_neighbors(
        &self,
        target: LabColor,
        k: usize,
        algorithm: DeltaEAlgorithm,
    ) -> Vec<Neighbor<'_, T>> {
        self.query(target, algorithm, Limit::Nearest(k))
    }

    /// Every color within `radius` of `target` (inclusive), nearest first
    pub fn within_radius(
        &self,
        target: LabColor,
        radius: f64,
        algorithm: DeltaEAlgorithm,
    ) -> Vec<Neighbor<'_, T>> {
        if radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        self.query(target, algorithm, Limit::Radius(radius))
    }

    /// N×N matrix over the indexed colors, in insertion order
    pub fn batch_calculate_distances(&self, algorithm: DeltaEAlgorithm) -> Vec<Vec<f64>> {
        let labs = self.labs();
        self.calculator.batch_calculate_distances(&labs, algorithm)
    }

    /// One row per target, one column per indexed color
    pub fn distance_matrix(&self, targets: &[LabColor], algorithm: DeltaEAlgorithm) -> Vec<Vec<f64>> {
        let labs = self.labs();
        self.calculator.distance_matrix(targets, &labs, algorithm)
    }

    fn labs(&self) -> Vec<LabColor> {
        self.colors.iter().map(|c| c.lab).collect()
    }

    fn query(&self, target: LabColor, algorithm: DeltaEAlgorithm, limit: Limit) -> Vec<Neighbor<'_, T>> {
        self.ranked(target, algorithm, limit)
            .into_iter()
            .map(|(distance, position)| Neighbor {
                color: &self.colors[position],
                position,
                distance,
            })
            .collect()
    }

    /// `(distance, position)` pairs ordered by distance then position
    fn ranked(&self, target: LabColor, algorithm: DeltaEAlgorithm, limit: Limit) -> Vec<(f64, usize)> {
        let Some(bounds) = self.bounds else {
            return Vec::new();
        };
        if !target.is_finite() || matches!(limit, Limit::Nearest(0)) {
            return Vec::new();
        }

        let scale = lower_bound_scale(algorithm, target, &bounds, self.calculator.cie94_params());
        let mut best: Vec<(f64, usize)> = Vec::new();
        let mut examined = 0usize;

        for (point, d76) in self.tree.nearest_iter(target.to_array()) {
            let cutoff = match limit {
                Limit::Nearest(k) if best.len() < k => f64::INFINITY,
                Limit::Nearest(k) => best[k - 1].0,
                Limit::Radius(radius) => radius,
            };
            if scale * d76 * (1.0 - BOUND_SLACK) > cutoff {
                break;
            }
            examined += 1;

            let distance = self
                .calculator
                .delta_e(algorithm, target, self.colors[point.position].lab);
            if distance.is_nan() || distance > cutoff {
                continue;
            }

            let entry = (distance, point.position);
            let at = best.partition_point(|probe| rank_order(probe, &entry) == Ordering::Less);
            match limit {
                Limit::Nearest(k) if at >= k => {}
                Limit::Nearest(k) => {
                    best.insert(at, entry);
                    best.truncate(k);
                }
                Limit::Radius(_) => best.insert(at, entry),
            }
        }

        tracing::trace!(
            %algorithm,
            examined,
            indexed = self.colors.len(),
            found = best.len(),
            "spatial query"
        );
        best
    }
}

fn rank_order(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> Vec<IndexedColor<usize>> {
        let mut colors = Vec::new();
        for l in 0..5 {
            for a in 0..5 {
                for b in 0..5 {
                    let lab = LabColor::new(
                        10.0 + l as f64 * 20.0,
                        -60.0 + a as f64 * 30.0,
                        -60.0 + b as f64 * 30.0,
                    );
                    colors.push(IndexedColor::new(colors.len(), lab));
                }
            }
        }
        colors
    }

    fn brute_force(
        colors: &[IndexedColor<usize>],
        target: LabColor,
        algorithm: DeltaEAlgorithm,
    ) -> Vec<(f64, usize)> {
        let mut all: Vec<(f64, usize)> = colors
            .iter()
            .enumerate()
            .map(|(i, c)| (algorithm.distance(target, c.lab), i))
            .collect();
        all.sort_by(rank_order);
        all
    }

    fn queries() -> Vec<LabColor> {
        vec![
            LabColor::new(47.0, 3.0, -8.0),
            LabColor::new(0.0, 0.0, 0.0),
            LabColor::new(100.0, 90.0, -90.0),
            LabColor::new(65.0, -31.0, 29.5),
            LabColor::new(30.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let colors = lattice();
        let index = SpatialIndexBuilder::from_iter(colors.clone())
            .leaf_size(3)
            .build()
            .unwrap();
        let calc = DistanceCalculator::default();
        let labs: Vec<LabColor> = colors.iter().map(|c| c.lab).collect();
        for target in queries() {
            for algorithm in DeltaEAlgorithm::ALL {
                let hit = index.find_nearest_neighbor(target, algorithm).unwrap();
                let expected = calc.find_closest_color(target, &labs, algorithm).unwrap();
                assert_eq!(hit.position, expected.index, "{algorithm} {target:?}");
                assert_eq!(hit.distance, expected.distance);
                assert_eq!(hit.color.id, expected.index);
            }
        }
    }

    #[test]
    fn test_knn_matches_brute_force() {
        let colors = lattice();
        let index = SpatialIndex::build(colors.clone()).unwrap();
        for target in queries() {
            for algorithm in DeltaEAlgorithm::ALL {
                let expected = brute_force(&colors, target, algorithm);
                for k in [1, 4, 17] {
                    let got: Vec<(f64, usize)> = index
                        .find_k_nearest_neighbors(target, k, algorithm)
                        .iter()
                        .map(|n| (n.distance, n.position))
                        .collect();
                    assert_eq!(got, expected[..k].to_vec(), "{algorithm} k={k}");
                }
            }
        }
    }

    #[test]
    fn test_ties_resolve_to_first_inserted() {
        let lab = LabColor::new(50.0, 10.0, 10.0);
        let index = SpatialIndex::build(vec![
            IndexedColor::new('x', LabColor::new(90.0, 0.0, 0.0)),
            IndexedColor::new('a', lab),
            IndexedColor::new('b', lab),
            IndexedColor::new('c', lab),
        ])
        .unwrap();
        let got = index.find_k_nearest_neighbors(LabColor::new(50.0, 10.0, 12.0), 2, DeltaEAlgorithm::Ciede2000);
        let ids: Vec<char> = got.iter().map(|n| n.color.id).collect();
        assert_eq!(ids, vec!['a', 'b']);
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = SpatialIndex::build(lattice().into_iter().take(6)).unwrap();
        let got = index.find_k_nearest_neighbors(LabColor::default(), 50, DeltaEAlgorithm::Cie94);
        assert_eq!(got.len(), 6);
        assert!(got.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(index.find_k_nearest_neighbors(LabColor::default(), 0, DeltaEAlgorithm::Cie76).is_empty());
    }

    #[test]
    fn test_within_radius_matches_filter() {
        let colors = lattice();
        let index = SpatialIndex::build(colors.clone()).unwrap();
        let target = LabColor::new(50.0, 0.0, 0.0);
        for algorithm in DeltaEAlgorithm::ALL {
            for radius in [0.0, 20.0, 35.0] {
                let expected: Vec<(f64, usize)> = brute_force(&colors, target, algorithm)
                    .into_iter()
                    .filter(|(d, _)| *d <= radius)
                    .collect();
                let got: Vec<(f64, usize)> = index
                    .within_radius(target, radius, algorithm)
                    .iter()
                    .map(|n| (n.distance, n.position))
                    .collect();
                assert_eq!(got, expected, "{algorithm} r={radius}");
            }
        }
        assert!(index.within_radius(target, f64::NAN, DeltaEAlgorithm::Cie76).is_empty());
        assert!(index.within_radius(target, -1.0, DeltaEAlgorithm::Cie76).is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index: SpatialIndex<u32> = SpatialIndex::builder().build().unwrap();
        assert!(index.is_empty());
        let target = LabColor::new(50.0, 0.0, 0.0);
        assert!(index.find_nearest_neighbor(target, DeltaEAlgorithm::Ciede2000).is_none());
        assert!(index.find_k_nearest_neighbors(target, 5, DeltaEAlgorithm::Cie76).is_empty());
        assert!(index.within_radius(target, 100.0, DeltaEAlgorithm::Cie94).is_empty());
        assert!(index.batch_calculate_distances(DeltaEAlgorithm::Cie76).is_empty());
    }

    #[test]
    fn test_rejects_non_finite_and_zero_leaf() {
        let err = SpatialIndex::builder()
            .with_color(0, LabColor::new(50.0, 0.0, 0.0))
            .with_color(1, LabColor::new(f64::NAN, 0.0, 0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::NonFiniteCoordinate { position: 1 }));

        let err = SpatialIndex::builder()
            .with_color(0, LabColor::default())
            .leaf_size(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_non_finite_query_finds_nothing() {
        let index = SpatialIndex::build(lattice()).unwrap();
        let target = LabColor::new(f64::INFINITY, 0.0, 0.0);
        assert!(index.find_nearest_neighbor(target, DeltaEAlgorithm::Cie76).is_none());
    }

    #[test]
    fn test_matrices_follow_insertion_order() {
        let colors = lattice();
        let index = SpatialIndex::build(colors.clone()).unwrap();
        let m = index.batch_calculate_distances(DeltaEAlgorithm::Ciede2000);
        assert_eq!(m.len(), colors.len());
        assert_eq!(m[3][7], DeltaEAlgorithm::Ciede2000.distance(colors[3].lab, colors[7].lab));

        let targets = [LabColor::new(50.0, 0.0, 0.0)];
        let rows = index.distance_matrix(&targets, DeltaEAlgorithm::Cie94);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][11], DeltaEAlgorithm::Cie94.distance(targets[0], colors[11].lab));
    }

    #[test]
    fn test_builder_from_config() {
        let mut config = EngineConfig::default();
        config.index.leaf_size = 2;
        config.cie94 = Cie94Params::textiles();
        let index = SpatialIndexBuilder::from_config(&config)
            .with_color("a", LabColor::new(40.0, 0.0, 0.0))
            .build()
            .unwrap();
        assert_eq!(index.calculator().cie94_params(), &Cie94Params::textiles());
        let hit = index
            .find_nearest_neighbor(LabColor::new(50.0, 0.0, 0.0), DeltaEAlgorithm::Cie94)
            .unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-12);
    }
}
