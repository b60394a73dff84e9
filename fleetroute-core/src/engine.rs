//! Boundary to the external search engine.
//!
//! The engine owns the combinatorial search. This crate only describes the
//! problem ([`RoutingModel`]) and the search configuration
//! ([`SearchParameters`]); engines answer with an [`Assignment`] or `None`
//! when no feasible solution was found within the budget.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{CumulVar, RoutingModel, SearchParameters};

/// Failures inside an engine, as opposed to an infeasible problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine could not represent the model.
    #[error("engine rejected the model: {0}")]
    Model(String),
    /// The search itself failed.
    #[error("engine search failed: {0}")]
    Search(String),
    /// The engine cannot honour part of the model or the parameters.
    #[error("unsupported by the engine: {0}")]
    Unsupported(String),
}

/// Solves a [`RoutingModel`].
///
/// Implementations block until the search terminates. A single engine value
/// must not be re-entered concurrently against the same model; independent
/// models may be solved on separate threads.
pub trait SolverEngine: Send + Sync {
    /// Search for an assignment.
    ///
    /// Returns `Ok(None)` when no assignment satisfying every constraint was
    /// found.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the engine itself fails.
    fn solve(
        &self,
        model: &RoutingModel,
        params: &SearchParameters,
    ) -> Result<Option<Assignment>, EngineError>;
}

/// Successor function and cumulative values chosen by an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    next: Vec<Option<usize>>,
    cumuls: BTreeMap<String, Vec<Option<f64>>>,
    objective: f64,
}

impl Assignment {
    /// Wrap a raw successor vector indexed by route position.
    #[must_use]
    pub const fn new(next: Vec<Option<usize>>, objective: f64) -> Self {
        Self {
            next,
            cumuls: BTreeMap::new(),
            objective,
        }
    }

    /// Build from the customer locations each vehicle visits, in order.
    ///
    /// Vehicles missing from `visits` stay at the depot. The objective is
    /// the model's total arc cost.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Model`] when `visits` names more vehicles than
    /// the model has, or a location that is not a customer.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use fleetroute_core::{Assignment, DistanceBlend, DistanceMatrix, RoutingModelBuilder};
    ///
    /// let positions = vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 3.0, y: 4.0 }];
    /// let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
    /// let model = RoutingModelBuilder::new(positions, distances).build()?;
    /// let assignment = Assignment::from_visits(&model, &[vec![1]])?;
    /// assert_eq!(assignment.objective_value(), 10.0);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_visits(model: &RoutingModel, visits: &[Vec<usize>]) -> Result<Self, EngineError> {
        let manager = model.manager();
        if visits.len() > manager.num_vehicles() {
            return Err(EngineError::Model(format!(
                "{} routes supplied for {} vehicles",
                visits.len(),
                manager.num_vehicles()
            )));
        }
        let mut next = vec![None; manager.len()];
        let mut objective = 0.0;
        for vehicle in 0..manager.num_vehicles() {
            let stops = visits.get(vehicle).map_or(&[][..], Vec::as_slice);
            let mut indices = Vec::with_capacity(stops.len() + 2);
            indices.extend(manager.start(vehicle));
            for &node in stops {
                let index = manager.node_to_index(node).ok_or_else(|| {
                    EngineError::Model(format!("location {node} is not a customer"))
                })?;
                indices.push(index);
            }
            indices.extend(manager.end(vehicle));
            for pair in indices.windows(2) {
                if let &[from, to] = pair {
                    if let Some(slot) = next.get_mut(from) {
                        *slot = Some(to);
                    }
                    objective += model.arc_cost(from, to).unwrap_or(0.0);
                }
            }
        }
        Ok(Self::new(next, objective))
    }

    /// Attach cumulative values for `dimension`, indexed by route position.
    #[must_use]
    pub fn with_cumuls(mut self, dimension: &str, values: Vec<Option<f64>>) -> Self {
        self.cumuls.insert(dimension.to_owned(), values);
        self
    }

    /// Successor of `index`; `None` for route ends and unknown indices.
    #[must_use]
    pub fn next(&self, index: usize) -> Option<usize> {
        self.next.get(index).copied().flatten()
    }

    /// Value of a cumulative variable, if the engine reported it.
    #[must_use]
    pub fn cumul(&self, var: &CumulVar) -> Option<f64> {
        self.cumuls
            .get(&var.dimension)
            .and_then(|values| values.get(var.index))
            .copied()
            .flatten()
    }

    /// Total arc cost of the assignment.
    #[must_use]
    pub const fn objective_value(&self) -> f64 {
        self.objective
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect for readable failures"
)]
mod tests {
    use super::*;
    use crate::{DistanceBlend, DistanceMatrix, RoutingModelBuilder, TIME};
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn model() -> RoutingModel {
        let positions = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 0.0, y: 10.0 },
        ];
        let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::MANHATTAN);
        RoutingModelBuilder::new(positions, distances)
            .vehicles(2)
            .build()
            .expect("valid model")
    }

    #[rstest]
    fn from_visits_links_sentinels(model: RoutingModel) {
        let assignment = Assignment::from_visits(&model, &[vec![2, 1]]).expect("valid visits");
        let manager = model.manager();
        let first = manager.node_to_index(2).expect("index");
        let second = manager.node_to_index(1).expect("index");
        assert_eq!(assignment.next(0), Some(first));
        assert_eq!(assignment.next(first), Some(second));
        assert_eq!(assignment.next(second), model.end(0));
        // Unused vehicle goes straight to its end.
        assert_eq!(assignment.next(1), model.end(1));
        assert!((assignment.objective_value() - 40.0).abs() < 1e-9);
    }

    #[rstest]
    fn from_visits_rejects_depot_and_extra_routes(model: RoutingModel) {
        assert!(Assignment::from_visits(&model, &[vec![0]]).is_err());
        assert!(Assignment::from_visits(&model, &[vec![], vec![], vec![1]]).is_err());
    }

    #[rstest]
    fn cumuls_are_looked_up_by_dimension() {
        let assignment =
            Assignment::new(vec![None; 3], 0.0).with_cumuls(TIME, vec![Some(1.0), None]);
        assert_eq!(assignment.cumul(&CumulVar::new(TIME, 0)), Some(1.0));
        assert_eq!(assignment.cumul(&CumulVar::new(TIME, 1)), None);
        assert_eq!(assignment.cumul(&CumulVar::new("Other", 0)), None);
    }
}
