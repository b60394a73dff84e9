//! Test-only engines and model fixtures.
//!
//! The helpers in this module are available to unit tests and to dependent
//! crates enabling the `test-support` feature.

use std::sync::Mutex;

use geo::Coord;

use crate::{
    Assignment, DistanceBlend, DistanceMatrix, EngineError, RoutingModel, RoutingModelBuilder,
    SearchParameters, SolverEngine,
};

/// Engine replaying a fixed set of routes and recording every call.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    visits: Option<Vec<Vec<usize>>>,
    calls: Mutex<Vec<SearchParameters>>,
}

impl ScriptedEngine {
    /// Answer every solve with these customer visits per vehicle.
    #[must_use]
    pub const fn visiting(visits: Vec<Vec<usize>>) -> Self {
        Self {
            visits: Some(visits),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Report every solve as infeasible.
    #[must_use]
    pub const fn infeasible() -> Self {
        Self {
            visits: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Parameters received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<SearchParameters> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl SolverEngine for ScriptedEngine {
    fn solve(
        &self,
        model: &RoutingModel,
        params: &SearchParameters,
    ) -> Result<Option<Assignment>, EngineError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(*params);
        }
        self.visits
            .as_deref()
            .map(|visits| Assignment::from_visits(model, visits))
            .transpose()
    }
}

/// Engine that always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingEngine;

impl SolverEngine for FailingEngine {
    fn solve(
        &self,
        _model: &RoutingModel,
        _params: &SearchParameters,
    ) -> Result<Option<Assignment>, EngineError> {
        Err(EngineError::Search("scripted failure".to_owned()))
    }
}

/// Model with the depot at the origin and customers spaced ten units apart
/// along the x axis.
///
/// # Panics
///
/// Panics when `locations` or `vehicles` is zero.
#[must_use]
#[expect(clippy::expect_used, reason = "fixture inputs are known to be valid")]
pub fn line_model(locations: usize, vehicles: usize) -> RoutingModel {
    let positions = line_positions(locations);
    let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
    RoutingModelBuilder::new(positions, distances)
        .vehicles(vehicles)
        .build()
        .expect("line model inputs are valid")
}

/// Positions used by [`line_model`].
#[must_use]
pub fn line_positions(locations: usize) -> Vec<Coord<f64>> {
    (0..locations)
        .map(|id| Coord {
            x: 10.0 * f64::from(u32::try_from(id).unwrap_or(u32::MAX)),
            y: 0.0,
        })
        .collect()
}

/// Cheapest closed tour through every location, starting and ending at the
/// depot, found by exhaustive enumeration. Intended for tiny instances.
#[must_use]
pub fn brute_force_tour_cost(distances: &DistanceMatrix) -> f64 {
    let mut customers: Vec<usize> = (1..distances.len()).collect();
    let mut best = f64::INFINITY;
    permute(&mut customers, 0, &mut |order| {
        let mut stops = Vec::with_capacity(order.len() + 2);
        stops.push(0);
        stops.extend_from_slice(order);
        stops.push(0);
        let cost: f64 = stops
            .windows(2)
            .filter_map(|pair| match pair {
                &[from, to] => distances.get(from, to),
                _ => None,
            })
            .sum();
        best = best.min(cost);
    });
    if best.is_finite() { best } else { 0.0 }
}

fn permute(items: &mut [usize], k: usize, visit: &mut dyn FnMut(&[usize])) {
    if k >= items.len() {
        visit(items);
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permute(items, k + 1, visit);
        items.swap(k, i);
    }
}
