//! Property-based tests for the problem formulation.
//!
//! # Invariants tested
//!
//! - **Matrix shape:** blends in `[0, 1]` give a symmetric matrix with a zero
//!   diagonal and non-negative entries.
//! - **Index bijection:** every customer maps to a unique index and back, and
//!   every sentinel maps to the depot.
//! - **Extraction coverage:** any partition of the customers across vehicles
//!   extracts to routes visiting each customer exactly once.

use std::collections::HashSet;

use fleetroute_core::{
    Assignment, DEPOT, DistanceBlend, DistanceMatrix, IndexKind, IndexManager, Palette,
    RoutingModelBuilder, Solution,
};
use geo::Coord;
use proptest::prelude::*;

fn positions_strategy(max: usize) -> impl Strategy<Value = Vec<Coord<f64>>> {
    prop::collection::vec((-500.0_f64..500.0, -500.0_f64..500.0), 1..=max)
        .prop_map(|points| points.into_iter().map(|(x, y)| Coord { x, y }).collect())
}

/// Customers `1..locations` dealt across `vehicles` routes in a shuffled
/// order.
fn partition_strategy(
    locations: usize,
    vehicles: usize,
) -> impl Strategy<Value = Vec<Vec<usize>>> {
    let customers: Vec<usize> = (1..locations).collect();
    let len = customers.len();
    (
        Just(customers).prop_shuffle(),
        prop::collection::vec(0..vehicles, len),
    )
        .prop_map(move |(order, owners)| {
            let mut routes = vec![Vec::new(); vehicles];
            for (customer, owner) in order.into_iter().zip(owners) {
                if let Some(route) = routes.get_mut(owner) {
                    route.push(customer);
                }
            }
            routes
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn interpolating_blends_give_symmetric_matrices(
        positions in positions_strategy(12),
        factor in 0.0_f64..=1.0,
    ) {
        let matrix = DistanceMatrix::from_positions(&positions, DistanceBlend::new(factor));
        prop_assert_eq!(matrix.len(), positions.len());
        for i in 0..matrix.len() {
            prop_assert_eq!(matrix.get(i, i), Some(0.0));
            for j in 0..matrix.len() {
                let forward = matrix.get(i, j).unwrap_or(f64::NAN);
                let backward = matrix.get(j, i).unwrap_or(f64::NAN);
                prop_assert!(forward >= 0.0);
                prop_assert!((forward - backward).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn index_manager_is_a_bijection(locations in 1_usize..40, vehicles in 1_usize..8) {
        let manager = IndexManager::new(locations, vehicles);
        prop_assert_eq!(manager.len(), locations - 1 + 2 * vehicles);
        let mut seen = HashSet::new();
        for node in 1..locations {
            let index = manager.node_to_index(node);
            prop_assert!(index.is_some());
            let index = index.unwrap_or_default();
            prop_assert!(seen.insert(index));
            prop_assert_eq!(manager.index_to_node(index), Some(node));
            prop_assert_eq!(manager.kind(index), Some(IndexKind::Customer(node)));
        }
        for vehicle in 0..vehicles {
            for sentinel in [manager.start(vehicle), manager.end(vehicle)] {
                prop_assert!(sentinel.is_some());
                let index = sentinel.unwrap_or_default();
                prop_assert!(seen.insert(index));
                prop_assert_eq!(manager.index_to_node(index), Some(DEPOT));
            }
        }
        prop_assert_eq!(seen.len(), manager.len());
        prop_assert_eq!(manager.node_to_index(DEPOT), None);
    }

    #[test]
    fn extraction_covers_every_customer_once(
        (positions, vehicles, routes) in (positions_strategy(10), 1_usize..4)
            .prop_flat_map(|(positions, vehicles)| {
                let partition = partition_strategy(positions.len(), vehicles);
                (Just(positions), Just(vehicles), partition)
            }),
    ) {
        let locations = positions.len();
        let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
        let model = RoutingModelBuilder::new(positions, distances)
            .vehicles(vehicles)
            .build();
        prop_assert!(model.is_ok());
        let Ok(model) = model else { return Ok(()); };
        let assignment = Assignment::from_visits(&model, &routes);
        prop_assert!(assignment.is_ok());
        let Ok(assignment) = assignment else { return Ok(()); };
        let solution = Solution::new(&model, assignment);

        let extracted = solution.routes();
        prop_assert!(extracted.is_ok());
        let extracted = extracted.unwrap_or_default();
        prop_assert_eq!(extracted.len(), vehicles);
        let mut visited: Vec<usize> = extracted
            .iter()
            .flat_map(|route| route.customers().iter().copied())
            .collect();
        visited.sort_unstable();
        prop_assert_eq!(visited, (1..locations).collect::<Vec<_>>());
        prop_assert!(solution.verify().is_ok());

        let cost: f64 = extracted.iter().map(|route| route.cost).sum();
        prop_assert!((cost - solution.objective_value()).abs() < 1e-6);
        let edges = solution.edges(&Palette::default());
        prop_assert_eq!(edges, solution.edges(&Palette::default()));
    }
}
