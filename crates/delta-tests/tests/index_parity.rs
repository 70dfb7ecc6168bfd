//! Spatial index results against brute-force scans
//!
//! Every query must return exactly what a linear scan with the same formula
//! returns: same colors, same distances, same tie order.

use delta_tests::{brute_force_ranking, lattice_lab_colors, random_lab_colors};
use oxdelta_core::{
    DeltaEAlgorithm, DistanceCalculator, IndexedColor, LabColor, SpatialIndex, SpatialIndexBuilder,
};
use rayon::prelude::*;

const CANDIDATES: usize = 600;
const QUERIES: usize = 50;

fn build(labs: &[LabColor], leaf_size: usize) -> SpatialIndex<usize> {
    labs.iter()
        .enumerate()
        .map(|(i, &lab)| IndexedColor::new(i, lab))
        .collect::<SpatialIndexBuilder<usize>>()
        .leaf_size(leaf_size)
        .build()
        .expect("generated colors are finite")
}

#[test]
fn test_nearest_matches_linear_scan() {
    let labs = random_lab_colors(1, CANDIDATES);
    let queries = random_lab_colors(2, QUERIES);
    let index = build(&labs, 8);
    let calculator = DistanceCalculator::default();

    for algorithm in DeltaEAlgorithm::ALL {
        for &query in &queries {
            let expected = calculator
                .find_closest_color(query, &labs, algorithm)
                .expect("non-empty candidates");
            let hit = index
                .find_nearest_neighbor(query, algorithm)
                .expect("non-empty index");

            assert_eq!(hit.position, expected.index, "{algorithm} {query:?}");
            assert_eq!(hit.color.id, expected.index);
            assert!((hit.distance - expected.distance).abs() <= 1e-9);
        }
    }
}

#[test]
fn test_knn_matches_linear_scan() {
    let labs = random_lab_colors(3, CANDIDATES);
    let queries = random_lab_colors(4, QUERIES);
    let index = build(&labs, 5);

    for algorithm in DeltaEAlgorithm::ALL {
        for &query in &queries {
            let ranking = brute_force_ranking(query, &labs, algorithm);
            for k in [1, 5, 25] {
                let got: Vec<(f64, usize)> = index
                    .find_k_nearest_neighbors(query, k, algorithm)
                    .iter()
                    .map(|n| (n.distance, n.position))
                    .collect();
                assert_eq!(got, ranking[..k].to_vec(), "{algorithm} k={k} {query:?}");
            }
        }
    }
}

#[test]
fn test_ties_match_linear_scan() {
    // Coarse lattice: many candidates sit at identical coordinates
    let labs = lattice_lab_colors(5, CANDIDATES, 20.0);
    let queries = lattice_lab_colors(6, QUERIES, 10.0);
    let index = build(&labs, 4);

    for algorithm in DeltaEAlgorithm::ALL {
        for &query in &queries {
            let ranking = brute_force_ranking(query, &labs, algorithm);
            let got: Vec<usize> = index
                .find_k_nearest_neighbors(query, 12, algorithm)
                .iter()
                .map(|n| n.position)
                .collect();
            let expected: Vec<usize> = ranking[..12].iter().map(|r| r.1).collect();
            assert_eq!(got, expected, "{algorithm} {query:?}");
        }
    }
}

#[test]
fn test_radius_matches_linear_scan() {
    let labs = random_lab_colors(7, CANDIDATES);
    let queries = random_lab_colors(8, 20);
    let index = build(&labs, 8);

    for algorithm in DeltaEAlgorithm::ALL {
        for &query in &queries {
            for radius in [5.0, 15.0, 40.0] {
                let expected: Vec<(f64, usize)> = brute_force_ranking(query, &labs, algorithm)
                    .into_iter()
                    .take_while(|(d, _)| *d <= radius)
                    .collect();
                let got: Vec<(f64, usize)> = index
                    .within_radius(query, radius, algorithm)
                    .iter()
                    .map(|n| (n.distance, n.position))
                    .collect();
                assert_eq!(got, expected, "{algorithm} r={radius} {query:?}");
            }
        }
    }
}

#[test]
fn test_leaf_size_does_not_change_results() {
    let labs = random_lab_colors(9, 300);
    let queries = random_lab_colors(10, 25);
    let reference = build(&labs, 1);

    for leaf_size in [2, 16, 300, 1000] {
        let index = build(&labs, leaf_size);
        for &query in &queries {
            for algorithm in DeltaEAlgorithm::ALL {
                let a: Vec<usize> = reference
                    .find_k_nearest_neighbors(query, 7, algorithm)
                    .iter()
                    .map(|n| n.position)
                    .collect();
                let b: Vec<usize> = index
                    .find_k_nearest_neighbors(query, 7, algorithm)
                    .iter()
                    .map(|n| n.position)
                    .collect();
                assert_eq!(a, b, "leaf_size={leaf_size} {algorithm}");
            }
        }
    }
}

#[test]
fn test_parallel_queries_match_serial() {
    let labs = random_lab_colors(11, CANDIDATES);
    let queries = random_lab_colors(12, 200);
    let index = build(&labs, 8);

    let serial: Vec<Option<usize>> = queries
        .iter()
        .map(|&q| index.find_nearest_neighbor(q, DeltaEAlgorithm::Ciede2000).map(|n| n.position))
        .collect();
    let parallel: Vec<Option<usize>> = queries
        .par_iter()
        .map(|&q| index.find_nearest_neighbor(q, DeltaEAlgorithm::Ciede2000).map(|n| n.position))
        .collect();
    assert_eq!(serial, parallel);
}

#[test]
fn test_index_matrix_matches_calculator() {
    let labs = random_lab_colors(13, 40);
    let index = build(&labs, 8);
    let calculator = DistanceCalculator::default();
    for algorithm in DeltaEAlgorithm::ALL {
        assert_eq!(
            index.batch_calculate_distances(algorithm),
            calculator.batch_calculate_distances(&labs, algorithm)
        );
    }
}
