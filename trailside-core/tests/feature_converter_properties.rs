//! Property-based tests for the feature converter.
//!
//! # Invariants tested
//!
//! - **Shape:** one feature per path, in path order.
//! - **Decoration:** matched paths carry name and difficulty; every path
//!   carries its trail id.
//! - **Idempotence:** converting the same input twice yields equal output.

use std::collections::HashSet;

use proptest::prelude::*;
use trailside_core::feature::{DIFFICULTY_PROPERTY, NAME_PROPERTY, TRAIL_ID_PROPERTY, convert};
use trailside_core::test_support::{line_path, sample_trail};
use trailside_core::{TrailBasicInfo, TrailPath};

/// Paths for trail ids `0..20` and basic info for a subset of those ids.
fn inputs() -> impl Strategy<Value = (Vec<TrailPath>, Vec<TrailBasicInfo>)> {
    (
        prop::collection::vec(0_u64..20, 0..12),
        prop::collection::vec(0_u64..20, 0..12),
        prop::sample::select(vec!["1", "2", "3", "4", "5"]),
    )
        .prop_map(|(path_trails, known, code)| {
            let paths = path_trails
                .iter()
                .zip(1_u64..)
                .map(|(trail_id, path_id)| line_path(path_id, *trail_id))
                .collect();
            let trails = known
                .iter()
                .map(|id| sample_trail(*id, &format!("Trail {id}"), code))
                .collect();
            (paths, trails)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: output has the same length and order as the paths.
    #[test]
    fn output_follows_path_order((paths, trails) in inputs()) {
        let collection = convert(&paths, &trails).expect("generated payloads are valid");

        prop_assert_eq!(collection.features.len(), paths.len());
        for (feature, path) in collection.features.iter().zip(&paths) {
            prop_assert_eq!(
                feature.property(TRAIL_ID_PROPERTY).and_then(|id| id.as_u64()),
                Some(path.trail_id)
            );
            prop_assert!(feature.geometry.is_some());
        }
    }

    /// Property: exactly the paths with known trails are decorated.
    #[test]
    fn only_matched_paths_are_decorated((paths, trails) in inputs()) {
        let known: HashSet<u64> = trails.iter().map(|trail| trail.id).collect();

        let collection = convert(&paths, &trails).expect("generated payloads are valid");

        for (feature, path) in collection.features.iter().zip(&paths) {
            let matched = known.contains(&path.trail_id);
            prop_assert_eq!(feature.contains_property(NAME_PROPERTY), matched);
            prop_assert_eq!(feature.contains_property(DIFFICULTY_PROPERTY), matched);
        }
    }

    /// Property: conversion is a pure function of its inputs.
    #[test]
    fn conversion_is_idempotent((paths, trails) in inputs()) {
        let first = convert(&paths, &trails).expect("generated payloads are valid");
        let second = convert(&paths, &trails).expect("generated payloads are valid");

        prop_assert_eq!(first, second);
    }
}
