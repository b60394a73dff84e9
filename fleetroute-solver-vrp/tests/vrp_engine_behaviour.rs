//! Behavioural tests for `VrpEngine` using rstest-bdd.


use std::cell::RefCell;
use std::time::Duration;

use fleetroute_core::test_support::brute_force_tour_cost;
use fleetroute_core::{
    Assignment, CumulVar, EngineError, RoutingModel, SearchController, Solution, TIME,
};
use fleetroute_solver_vrp::VrpEngine;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use scenario_support::{capacity_model, diamond_model, overloaded_model, windowed_model};

#[derive(Debug, Default)]
struct EngineWorld {
    model: RefCell<Option<RoutingModel>>,
    outcome: RefCell<Option<Result<Option<Assignment>, EngineError>>>,
}

impl EngineWorld {
    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_model(&self) -> RoutingModel {
        self.model
            .borrow()
            .clone()
            .expect("model should be prepared before solving")
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_assignment(&self) -> Assignment {
        self.outcome
            .borrow()
            .clone()
            .expect("search should run before assertions")
            .expect("expected the engine to succeed")
            .expect("expected a feasible solution")
    }

    fn run<F>(&self, search: F)
    where
        F: for<'c, 'm> FnOnce(
            &'c SearchController<'m, VrpEngine>,
        ) -> Result<Option<Solution<'m>>, EngineError>,
    {
        let model = self.expect_model();
        let controller = SearchController::new(&model, VrpEngine::new());
        let outcome =
            search(&controller).map(|found| found.map(|solution| solution.assignment().clone()));
        self.outcome.replace(Some(outcome));
    }
}

#[fixture]
fn world() -> EngineWorld {
    EngineWorld::default()
}

#[given("three customers around the depot served by one vehicle")]
fn given_diamond(world: &EngineWorld) {
    world.model.replace(Some(diamond_model()));
}

#[given("four customers with demands served by two vehicles of capacity six")]
fn given_capacities(world: &EngineWorld) {
    world.model.replace(Some(capacity_model()));
}

#[given("a customer that must be served between one and two hours")]
fn given_window(world: &EngineWorld) {
    world.model.replace(Some(windowed_model()));
}

#[given("a customer whose demand exceeds every vehicle capacity")]
fn given_overload(world: &EngineWorld) {
    world.model.replace(Some(overloaded_model()));
}

#[when("the baseline search runs")]
fn when_baseline(world: &EngineWorld) {
    world.run(|controller| controller.solve());
}

#[when("guided local search runs for one second")]
fn when_guided(world: &EngineWorld) {
    world.run(|controller| controller.guided_local_search(Duration::from_secs(1)));
}

#[when("tabu search runs for one second")]
fn when_tabu(world: &EngineWorld) {
    world.run(|controller| controller.tabu_search(Duration::from_secs(1)));
}

#[then("a solution is returned")]
fn then_solution(world: &EngineWorld) {
    let outcome = world.outcome.borrow().clone();
    assert!(matches!(outcome, Some(Ok(Some(_)))));
}

#[then("no solution is returned")]
fn then_no_solution(world: &EngineWorld) {
    let outcome = world.outcome.borrow().clone();
    assert!(matches!(outcome, Some(Ok(None))));
}

#[then("its cost equals the exhaustive optimum")]
fn then_optimal(world: &EngineWorld) {
    let model = world.expect_model();
    let optimum = brute_force_tour_cost(model.distances());
    let cost = world.expect_assignment().objective_value();
    assert!(
        (cost - optimum).abs() < 1e-6,
        "cost {cost} differs from optimum {optimum}"
    );
}

#[then("no vehicle carries more than six units")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_loads_fit(world: &EngineWorld) {
    let model = world.expect_model();
    let routes = Solution::new(&model, world.expect_assignment())
        .routes()
        .expect("routes extract");
    assert!(routes.iter().all(|route| route.load <= 6));
    assert_eq!(routes.iter().map(|route| route.load).sum::<u64>(), 10);
}

#[then("the customer is served between 1000 and 2000 time units")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_window_met(world: &EngineWorld) {
    let model = world.expect_model();
    let index = model.manager().node_to_index(1).expect("customer index");
    let served = world
        .expect_assignment()
        .cumul(&CumulVar::new(TIME, index))
        .expect("arrival time reported");
    assert!((1000.0 - 1e-6..=2000.0 + 1e-6).contains(&served));
}

#[then("the solution passes verification")]
fn then_verified(world: &EngineWorld) {
    let model = world.expect_model();
    assert_eq!(
        Solution::new(&model, world.expect_assignment()).verify(),
        Ok(())
    );
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 0)]
fn small_tour_is_optimal(world: EngineWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 1)]
fn capacities_split_customers(world: EngineWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 2)]
fn time_windows_are_met(world: EngineWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 3)]
fn overload_is_infeasible(world: EngineWorld) {
    let _ = world;
}
