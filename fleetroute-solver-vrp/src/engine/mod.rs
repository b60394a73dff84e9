//! `VrpEngine` implementation backed by `vrp-core`.

use std::time::Instant;

use fleetroute_core::{
    Assignment, EngineError, Metaheuristic, RoutingModel, SearchParameters, SolverEngine,
};

use crate::vrp::{self, Budget};

/// Configuration for [`VrpEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrpEngineConfig {
    /// Upper bound on `vrp-core` generations for metaheuristic searches.
    pub max_generations: usize,
    /// Upper bound on generations for the baseline search.
    pub baseline_generations: usize,
}

impl Default for VrpEngineConfig {
    fn default() -> Self {
        Self {
            max_generations: 200,
            baseline_generations: 10,
        }
    }
}

/// Native engine using `vrp-core` to search for minimum-distance routes.
///
/// `vrp-core` runs a single hyper-heuristic regardless of the requested
/// [`Metaheuristic`]; the choice selects the generation budget.
///
/// # Examples
/// ```
/// use fleetroute_core::{ProblemConfig, SearchController};
/// use fleetroute_solver_vrp::VrpEngine;
///
/// let instance = ProblemConfig::new(5).with_vehicles(2).with_seed(9).build()?;
/// let controller = SearchController::new(&instance.model, VrpEngine::default());
/// let solution = controller.solve()?.expect("an uncapped fleet is always feasible");
/// assert!(solution.verify().is_ok());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VrpEngine {
    config: VrpEngineConfig,
}

impl VrpEngine {
    /// Construct an engine using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an engine with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpEngineConfig) -> Self {
        Self { config }
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpEngineConfig {
        &self.config
    }

    fn budget(&self, params: &SearchParameters) -> Budget {
        let max_generations = match params.metaheuristic {
            Metaheuristic::None => self.config.baseline_generations,
            Metaheuristic::GuidedLocalSearch
            | Metaheuristic::TabuSearch
            | Metaheuristic::SimulatedAnnealing => self.config.max_generations,
        };
        let max_seconds = params
            .time_limit()
            .map(|limit| usize::try_from(limit.as_secs().max(1)).unwrap_or(usize::MAX));
        Budget {
            max_generations,
            max_seconds,
        }
    }
}

impl SolverEngine for VrpEngine {
    fn solve(
        &self,
        model: &RoutingModel,
        params: &SearchParameters,
    ) -> Result<Option<Assignment>, EngineError> {
        let started_at = Instant::now();
        if model.locations().len() <= 1 {
            log::debug!("no customers to route; every vehicle stays at the depot");
            return Assignment::from_visits(model, &[]).map(Some);
        }

        let budget = self.budget(params);
        if params.metaheuristic != Metaheuristic::None {
            log::debug!(
                "vrp-core approximates {} with its hyper-heuristic search",
                params.metaheuristic
            );
        }
        log::debug!(
            "vrp-core budget: {} generations, time limit {:?}s",
            budget.max_generations,
            budget.max_seconds
        );
        let outcome = vrp::solve(model, budget)?;
        log::debug!("vrp-core search finished in {:?}", started_at.elapsed());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests;
