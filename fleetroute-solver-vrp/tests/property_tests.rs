//! Property-based tests for the `vrp-core` engine.
//!
//! # Invariants tested
//!
//! - **Feasibility:** every returned solution passes postsolve verification.
//! - **Lower bound:** no single-vehicle tour beats the exhaustive optimum.
//! - **Capacity:** loads never exceed vehicle capacities.

use fleetroute_core::test_support::brute_force_tour_cost;
use fleetroute_core::{ProblemConfig, SearchController};
use fleetroute_solver_vrp::{VrpEngine, VrpEngineConfig};
use proptest::prelude::*;

fn engine() -> VrpEngine {
    VrpEngine::with_config(VrpEngineConfig {
        max_generations: 20,
        baseline_generations: 5,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn single_vehicle_tours_are_feasible_and_bounded(
        seed in any::<u64>(),
        locations in 2_usize..=6,
        blend in 0.0_f64..=1.0,
    ) {
        let instance = ProblemConfig::new(locations)
            .with_seed(seed)
            .with_blend(blend)
            .build();
        prop_assert!(instance.is_ok());
        let Ok(instance) = instance else { return Ok(()); };
        let controller = SearchController::new(&instance.model, engine());
        let outcome = controller.solve();
        prop_assert!(matches!(outcome, Ok(Some(_))));
        let Ok(Some(solution)) = outcome else { return Ok(()); };
        prop_assert_eq!(solution.verify(), Ok(()));
        let optimum = brute_force_tour_cost(instance.model.distances());
        prop_assert!(solution.objective_value() >= optimum - 1e-6);
    }

    #[test]
    fn capacitated_fleets_respect_loads(
        seed in any::<u64>(),
        demands in prop::collection::vec(1_u32..=4, 4..=7),
    ) {
        let locations = demands.len() + 1;
        let mut all_demands = vec![0];
        all_demands.extend(demands);
        let instance = ProblemConfig::new(locations)
            .with_vehicles(3)
            .with_capacities(vec![8, 8, 8], all_demands)
            .with_seed(seed)
            .build();
        prop_assert!(instance.is_ok());
        let Ok(instance) = instance else { return Ok(()); };
        let controller = SearchController::new(&instance.model, engine());
        let outcome = controller.solve();
        prop_assert!(outcome.is_ok());
        if let Ok(Some(solution)) = outcome {
            prop_assert_eq!(solution.verify(), Ok(()));
            let routes = solution.routes();
            prop_assert!(routes.is_ok());
            for route in routes.unwrap_or_default() {
                prop_assert!(route.load <= 8);
            }
        }
    }
}
