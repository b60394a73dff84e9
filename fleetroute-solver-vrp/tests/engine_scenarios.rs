#![expect(
    clippy::expect_used,
    reason = "tests use expect for readable failures"
)]

//! Scenario tests running `VrpEngine` through the search controller.


use std::time::Duration;

use fleetroute_core::test_support::brute_force_tour_cost;
use fleetroute_core::{
    DISTANCE, Metaheuristic, Palette, ProblemConfig, RenderGraph, SearchController,
    SearchParameters, TIME, TimeWindow,
};
use fleetroute_solver_vrp::{VrpEngine, VrpEngineConfig};
use geo::Coord;
use rstest::rstest;

use scenario_support::{capacity_model, diamond_model};

fn quick_engine() -> VrpEngine {
    VrpEngine::with_config(VrpEngineConfig {
        max_generations: 50,
        baseline_generations: 10,
    })
}

#[rstest]
#[case(Metaheuristic::None)]
#[case(Metaheuristic::GuidedLocalSearch)]
#[case(Metaheuristic::TabuSearch)]
#[case(Metaheuristic::SimulatedAnnealing)]
fn every_strategy_reaches_the_optimum(#[case] strategy: Metaheuristic) {
    let model = diamond_model();
    let controller = SearchController::new(&model, quick_engine());
    let solution = controller
        .solve_with(SearchParameters::new(strategy, Duration::from_secs(1)))
        .expect("engine succeeds")
        .expect("feasible");
    let optimum = brute_force_tour_cost(model.distances());
    assert!((solution.objective_value() - optimum).abs() < 1e-6);
    assert_eq!(solution.verify(), Ok(()));
}

#[rstest]
fn extraction_is_repeatable() {
    let model = capacity_model();
    let controller = SearchController::new(&model, quick_engine());
    let solution = controller
        .solve()
        .expect("engine succeeds")
        .expect("feasible");
    let palette = Palette::default();
    assert_eq!(solution.edges(&palette), solution.edges(&palette));
    assert_eq!(solution.routes(), solution.routes());
    let graph = RenderGraph::from_solution(&solution, &palette).expect("graph");
    let weight: f64 = graph.edges.iter().map(|edge| edge.weight).sum();
    assert!((weight - solution.objective_value()).abs() < 1e-6);
}

#[rstest]
fn single_customer_saves_nothing() {
    let instance = ProblemConfig::new(2)
        .with_positions(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 30.0, y: 40.0 }])
        .build()
        .expect("valid config");
    let controller = SearchController::new(&instance.model, quick_engine());
    let solution = controller
        .solve()
        .expect("engine succeeds")
        .expect("feasible");
    assert!((solution.objective_value() - 100.0).abs() < 1e-6);
    let saving = solution.distance_saving().expect("scorable");
    assert!(saving.abs() < 1e-6);
}

#[rstest]
fn tight_distance_cap_is_infeasible() {
    let instance = ProblemConfig::new(3)
        .with_vehicles(2)
        .with_max_distance(15.0)
        .with_positions(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: -10.0, y: 0.0 },
        ])
        .build()
        .expect("valid config");
    assert!(instance.model.dimension(DISTANCE).is_some());
    let controller = SearchController::new(&instance.model, quick_engine());
    let outcome = controller.solve().expect("engine succeeds");
    assert!(outcome.is_none());
}

#[rstest]
fn distance_cap_splits_the_fleet() {
    let instance = ProblemConfig::new(3)
        .with_vehicles(2)
        .with_max_distance(25.0)
        .with_positions(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: -10.0, y: 0.0 },
        ])
        .build()
        .expect("valid config");
    let controller = SearchController::new(&instance.model, quick_engine());
    let solution = controller
        .guided_local_search(Duration::from_secs(1))
        .expect("engine succeeds")
        .expect("feasible");
    let routes = solution.routes().expect("routes extract");
    assert!(routes.iter().all(|route| route.cost <= 25.0 + 1e-6));
    assert_eq!(routes.iter().filter(|route| !route.is_empty()).count(), 2);
}

#[rstest]
fn generated_windowed_instance_verifies() {
    let open = TimeWindow::unconstrained();
    let early = TimeWindow::new(0.0, 3.0);
    let windows = vec![open, early, open, early, open, early];
    let instance = ProblemConfig::new(6)
        .with_vehicles(3)
        .with_windows(windows)
        .with_seed(5)
        .build()
        .expect("valid config");
    assert!(instance.model.dimension(TIME).is_some());
    let controller = SearchController::new(&instance.model, quick_engine());
    let solution = controller
        .simulated_annealing(Duration::from_secs(1))
        .expect("engine succeeds")
        .expect("feasible");
    assert_eq!(solution.verify(), Ok(()));
}
