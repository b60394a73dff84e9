//! Search strategy selection.
//!
//! [`SearchController`] is a typed configuration surface over a
//! [`SolverEngine`]: each call builds fresh [`SearchParameters`] and hands
//! the model to the engine synchronously. It performs no search itself.

use std::fmt;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EngineError, RoutingModel, Solution, SolverEngine};

/// Local-search metaheuristic guiding the engine past first improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metaheuristic {
    /// Construction plus first-improvement descent only.
    #[default]
    None,
    /// Penalise features of local optima to escape them.
    GuidedLocalSearch,
    /// Forbid recently reversed moves.
    TabuSearch,
    /// Accept worsening moves with a decaying probability.
    SimulatedAnnealing,
}

impl fmt::Display for Metaheuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::GuidedLocalSearch => "guided local search",
            Self::TabuSearch => "tabu search",
            Self::SimulatedAnnealing => "simulated annealing",
        };
        f.write_str(name)
    }
}

/// Parameters for one engine invocation.
///
/// A zero `time_limit` leaves termination to the engine's defaults.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use fleetroute_core::{Metaheuristic, SearchParameters};
///
/// let params = SearchParameters::new(Metaheuristic::TabuSearch, Duration::from_secs(5));
/// assert_eq!(params.time_limit(), Some(Duration::from_secs(5)));
/// assert_eq!(SearchParameters::default().time_limit(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchParameters {
    /// Strategy applied after the first solution.
    pub metaheuristic: Metaheuristic,
    /// Advisory wall-clock budget.
    pub time_limit: Duration,
}

impl SearchParameters {
    /// Construct parameters.
    #[must_use]
    pub const fn new(metaheuristic: Metaheuristic, time_limit: Duration) -> Self {
        Self {
            metaheuristic,
            time_limit,
        }
    }

    /// The time limit, or `None` when the engine default applies.
    #[must_use]
    pub const fn time_limit(&self) -> Option<Duration> {
        if self.time_limit.is_zero() {
            None
        } else {
            Some(self.time_limit)
        }
    }
}

/// Runs a [`SolverEngine`] against a single model.
///
/// Each method returns `Ok(None)` when the engine found no feasible
/// solution, and `Err` only for engine failures.
pub struct SearchController<'m, E> {
    model: &'m RoutingModel,
    engine: E,
}

impl<'m, E> SearchController<'m, E>
where
    E: SolverEngine,
{
    /// Bind `engine` to `model`.
    pub const fn new(model: &'m RoutingModel, engine: E) -> Self {
        Self { model, engine }
    }

    /// The bound model.
    #[must_use]
    pub const fn model(&self) -> &'m RoutingModel {
        self.model
    }

    /// The wrapped engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Solve with the engine's default search and no time limit.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from the engine.
    pub fn solve(&self) -> Result<Option<Solution<'m>>, EngineError> {
        self.solve_with(SearchParameters::default())
    }

    /// Solve using guided local search for at most `time_limit`.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from the engine.
    pub fn guided_local_search(
        &self,
        time_limit: Duration,
    ) -> Result<Option<Solution<'m>>, EngineError> {
        self.solve_with(SearchParameters::new(
            Metaheuristic::GuidedLocalSearch,
            time_limit,
        ))
    }

    /// Solve using tabu search for at most `time_limit`.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from the engine.
    pub fn tabu_search(&self, time_limit: Duration) -> Result<Option<Solution<'m>>, EngineError> {
        self.solve_with(SearchParameters::new(Metaheuristic::TabuSearch, time_limit))
    }

    /// Solve using simulated annealing for at most `time_limit`.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from the engine.
    pub fn simulated_annealing(
        &self,
        time_limit: Duration,
    ) -> Result<Option<Solution<'m>>, EngineError> {
        self.solve_with(SearchParameters::new(
            Metaheuristic::SimulatedAnnealing,
            time_limit,
        ))
    }

    /// Solve with explicit parameters.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from the engine.
    pub fn solve_with(
        &self,
        params: SearchParameters,
    ) -> Result<Option<Solution<'m>>, EngineError> {
        let started_at = Instant::now();
        log::debug!(
            "solving {} locations with {} vehicles using {} (limit {:?})",
            self.model.locations().len(),
            self.model.num_vehicles(),
            params.metaheuristic,
            params.time_limit()
        );
        let outcome = self.engine.solve(self.model, &params)?;
        match &outcome {
            Some(assignment) => log::info!(
                "{} found a solution with cost {:.3} in {:?}",
                params.metaheuristic,
                assignment.objective_value(),
                started_at.elapsed()
            ),
            None => log::info!(
                "{} found no feasible solution in {:?}",
                params.metaheuristic,
                started_at.elapsed()
            ),
        }
        Ok(outcome.map(|assignment| Solution::new(self.model, assignment)))
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect for readable failures"
)]
mod tests {
    use super::*;
    use crate::test_support::{FailingEngine, ScriptedEngine, line_model};
    use rstest::rstest;

    #[rstest]
    #[case(Metaheuristic::GuidedLocalSearch)]
    #[case(Metaheuristic::TabuSearch)]
    #[case(Metaheuristic::SimulatedAnnealing)]
    fn metaheuristic_calls_forward_strategy_and_limit(#[case] strategy: Metaheuristic) {
        let model = line_model(3, 1);
        let controller = SearchController::new(&model, ScriptedEngine::visiting(vec![vec![1, 2]]));
        let limit = Duration::from_secs(7);
        let solution = match strategy {
            Metaheuristic::GuidedLocalSearch => controller.guided_local_search(limit),
            Metaheuristic::TabuSearch => controller.tabu_search(limit),
            Metaheuristic::SimulatedAnnealing => controller.simulated_annealing(limit),
            Metaheuristic::None => controller.solve(),
        }
        .expect("engine succeeds");
        assert!(solution.is_some());
        assert_eq!(
            controller.engine().calls(),
            vec![SearchParameters::new(strategy, limit)]
        );
    }

    #[rstest]
    fn baseline_uses_defaults() {
        let model = line_model(2, 1);
        let controller = SearchController::new(&model, ScriptedEngine::visiting(vec![vec![1]]));
        controller.solve().expect("engine succeeds");
        assert_eq!(controller.engine().calls(), vec![SearchParameters::default()]);
    }

    #[rstest]
    fn infeasible_is_not_an_error() {
        let model = line_model(2, 1);
        let controller = SearchController::new(&model, ScriptedEngine::infeasible());
        let outcome = controller
            .tabu_search(Duration::from_secs(1))
            .expect("engine succeeds");
        assert!(outcome.is_none());
    }

    #[rstest]
    fn engine_failures_propagate() {
        let model = line_model(2, 1);
        let controller = SearchController::new(&model, FailingEngine);
        let err = controller.solve().expect_err("engine fails");
        assert!(matches!(err, EngineError::Search(_)));
    }
}
