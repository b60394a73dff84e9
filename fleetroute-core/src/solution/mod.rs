//! Turning engine assignments into explicit routes.
//!
//! A [`Solution`] pairs an [`Assignment`] with the model it solves. Routes
//! are derived on demand by walking each vehicle's successor chain from its
//! start sentinel to its end sentinel, so extraction is pure and repeatable.

mod score;
mod verify;

pub use score::{ScoreError, distance_saving};
pub use verify::VerificationError;

use thiserror::Error;

use crate::{Assignment, Colour, DEPOT, Palette, RoutingModel};

/// A broken successor chain in an [`Assignment`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A route position before the end has no successor.
    #[error("route of vehicle {vehicle} stops at index {index} without reaching its end")]
    MissingSuccessor {
        /// Vehicle whose route broke.
        vehicle: usize,
        /// Index lacking a successor.
        index: usize,
    },
    /// A successor is not a valid next position for the vehicle.
    #[error("route of vehicle {vehicle} jumps to invalid index {index}")]
    InvalidSuccessor {
        /// Vehicle whose route broke.
        vehicle: usize,
        /// Offending successor.
        index: usize,
    },
    /// The chain never reaches an end sentinel.
    #[error("route of vehicle {vehicle} loops without reaching its end")]
    Cycle {
        /// Vehicle whose route loops.
        vehicle: usize,
    },
}

/// One travelled arc of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEdge {
    /// Vehicle travelling the arc.
    pub vehicle: usize,
    /// Departure location.
    pub from: usize,
    /// Arrival location.
    pub to: usize,
    /// Arc cost.
    pub cost: f64,
    /// Display colour of the vehicle.
    pub colour: Colour,
}

/// The ordered stops of one vehicle, beginning and ending at the depot.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Vehicle serving the route.
    pub vehicle: usize,
    /// Location ids in visiting order, depot at both ends.
    pub stops: Vec<usize>,
    /// Total arc cost.
    pub cost: f64,
    /// Total demand collected, depot included.
    pub load: u64,
}

impl Route {
    /// Customer locations only.
    #[must_use]
    pub fn customers(&self) -> &[usize] {
        match self.stops.as_slice() {
            [_, inner @ .., _] => inner,
            _ => &[],
        }
    }

    /// Whether the vehicle stays at the depot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers().is_empty()
    }
}

/// An engine assignment bound to its model.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<'m> {
    model: &'m RoutingModel,
    assignment: Assignment,
}

impl<'m> Solution<'m> {
    /// Bind `assignment` to `model`.
    #[must_use]
    pub const fn new(model: &'m RoutingModel, assignment: Assignment) -> Self {
        Self { model, assignment }
    }

    /// The solved model.
    #[must_use]
    pub const fn model(&self) -> &'m RoutingModel {
        self.model
    }

    /// The raw engine output.
    #[must_use]
    pub const fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Total arc cost reported by the engine.
    #[must_use]
    pub const fn objective_value(&self) -> f64 {
        self.assignment.objective_value()
    }

    /// Savings against serving every location by its own round trip.
    ///
    /// # Errors
    ///
    /// See [`distance_saving`].
    pub fn distance_saving(&self) -> Result<f64, ScoreError> {
        distance_saving(Some(self))
    }

    /// Route-position indices visited by `vehicle`, sentinels included.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when the successor chain is broken.
    pub fn route_indices(&self, vehicle: usize) -> Result<Vec<usize>, ExtractError> {
        let manager = self.model.manager();
        let Some(start) = manager.start(vehicle) else {
            return Ok(Vec::new());
        };
        let end = manager.end(vehicle);
        let mut indices = vec![start];
        let mut current = start;
        while !manager.is_end(current) {
            if indices.len() > manager.len() {
                return Err(ExtractError::Cycle { vehicle });
            }
            let next = self
                .assignment
                .next(current)
                .ok_or(ExtractError::MissingSuccessor {
                    vehicle,
                    index: current,
                })?;
            let foreign_end = manager.is_end(next) && Some(next) != end;
            if next >= manager.len() || manager.is_start(next) || foreign_end {
                return Err(ExtractError::InvalidSuccessor {
                    vehicle,
                    index: next,
                });
            }
            indices.push(next);
            current = next;
        }
        Ok(indices)
    }

    /// The ordered arcs of every route, tagged with cost and vehicle colour.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when a successor chain is broken.
    pub fn edges(&self, palette: &Palette) -> Result<Vec<RouteEdge>, ExtractError> {
        let mut edges = Vec::new();
        for route in self.routes()? {
            let colour = palette.colour(route.vehicle);
            for pair in route.stops.windows(2) {
                if let &[from, to] = pair {
                    edges.push(RouteEdge {
                        vehicle: route.vehicle,
                        from,
                        to,
                        cost: self.model.distances().get(from, to).unwrap_or(0.0),
                        colour,
                    });
                }
            }
        }
        Ok(edges)
    }

    /// One route per vehicle, in vehicle order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when a successor chain is broken.
    pub fn routes(&self) -> Result<Vec<Route>, ExtractError> {
        (0..self.model.num_vehicles())
            .map(|vehicle| self.route(vehicle))
            .collect()
    }

    fn route(&self, vehicle: usize) -> Result<Route, ExtractError> {
        let manager = self.model.manager();
        let indices = self.route_indices(vehicle)?;
        let stops: Vec<usize> = indices
            .iter()
            .map(|&index| manager.index_to_node(index).unwrap_or(DEPOT))
            .collect();
        let cost = self.model.path_cost(&stops).unwrap_or(0.0);
        let load = indices
            .split_last()
            .map_or(&[][..], |(_, leading)| leading)
            .iter()
            .filter_map(|&index| self.model.demand(index))
            .map(u64::from)
            .sum();
        Ok(Route {
            vehicle,
            stops,
            cost,
            load,
        })
    }
}
