#![expect(
    clippy::expect_used,
    reason = "tests use expect for readable failures"
)]

//! Tests for the `VrpEngine`.

use std::time::Duration;

use super::*;
use fleetroute_core::test_support::{line_model, line_positions};
use fleetroute_core::{
    DimensionPolicy, DistanceBlend, DistanceMatrix, RoutingModelBuilder, Solution, TimeWindow,
    TimeWindowPolicy,
};
use rstest::rstest;

#[rstest]
#[case(Metaheuristic::None, 10)]
#[case(Metaheuristic::GuidedLocalSearch, 200)]
#[case(Metaheuristic::TabuSearch, 200)]
#[case(Metaheuristic::SimulatedAnnealing, 200)]
fn strategy_selects_generation_budget(#[case] strategy: Metaheuristic, #[case] expected: usize) {
    let engine = VrpEngine::new();
    let budget = engine.budget(&SearchParameters::new(strategy, Duration::ZERO));
    assert_eq!(budget.max_generations, expected);
    assert_eq!(budget.max_seconds, None);
}

#[rstest]
#[case(Duration::from_millis(300), 1)]
#[case(Duration::from_secs(4), 4)]
fn time_limit_maps_to_whole_seconds(#[case] limit: Duration, #[case] expected: usize) {
    let engine = VrpEngine::with_config(VrpEngineConfig {
        max_generations: 5,
        baseline_generations: 1,
    });
    let budget = engine.budget(&SearchParameters::new(Metaheuristic::TabuSearch, limit));
    assert_eq!(budget.max_seconds, Some(expected));
    assert_eq!(budget.max_generations, 5);
}

#[rstest]
fn depot_only_model_needs_no_search() {
    let model = line_model(1, 2);
    let assignment = VrpEngine::new()
        .solve(&model, &SearchParameters::default())
        .expect("engine succeeds")
        .expect("trivially feasible");
    assert_eq!(assignment.next(0), model.end(0));
    assert!(assignment.objective_value().abs() < f64::EPSILON);
}

#[rstest]
fn line_is_served_in_one_sweep() {
    let model = line_model(4, 1);
    let assignment = VrpEngine::new()
        .solve(&model, &SearchParameters::default())
        .expect("engine succeeds")
        .expect("feasible");
    assert!((assignment.objective_value() - 60.0).abs() < 1e-6);
    let solution = Solution::new(&model, assignment);
    assert_eq!(solution.verify(), Ok(()));
}

#[rstest]
fn oversized_demand_is_infeasible() {
    let positions = line_positions(3);
    let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
    let model = RoutingModelBuilder::new(positions, distances)
        .vehicles(2)
        .demands(vec![0, 5, 1])
        .capacities(vec![4, 4])
        .build()
        .expect("valid model");
    let outcome = VrpEngine::new()
        .solve(&model, &SearchParameters::default())
        .expect("engine succeeds");
    assert!(outcome.is_none());
}

#[rstest]
fn windowed_routes_report_start_and_end_times() {
    let positions = line_positions(3);
    let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
    let windows = vec![
        TimeWindow::unconstrained(),
        TimeWindow::new(0.02, 0.03),
        TimeWindow::unconstrained(),
    ];
    let model = RoutingModelBuilder::new(positions, distances)
        .policy(DimensionPolicy::TimeWindows(TimeWindowPolicy::new(
            windows, 1000.0,
        )))
        .build()
        .expect("valid model");
    assert_eq!(model.finalizer_objectives().len(), 2);

    let assignment = VrpEngine::new()
        .solve(&model, &SearchParameters::default())
        .expect("engine succeeds")
        .expect("feasible");
    for var in model.finalizer_objectives() {
        assert!(assignment.cumul(var).is_some(), "no time reported for {var:?}");
    }
    let end = model
        .finalizer_objectives()
        .last()
        .and_then(|var| assignment.cumul(var))
        .expect("end time reported");
    assert!((40.0 - 1e-6..=50.0 + 1e-6).contains(&end), "route ends at {end}");
    assert_eq!(Solution::new(&model, assignment).verify(), Ok(()));
}

#[rstest]
fn loads_beyond_engine_range_are_unsupported() {
    let positions = line_positions(2);
    let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
    let model = RoutingModelBuilder::new(positions, distances)
        .demands(vec![0, u32::MAX])
        .capacities(vec![u32::MAX])
        .build()
        .expect("valid model");
    let outcome = VrpEngine::new().solve(&model, &SearchParameters::default());
    assert!(
        matches!(outcome, Err(EngineError::Unsupported(_))),
        "unexpected outcome {outcome:?}"
    );
}
