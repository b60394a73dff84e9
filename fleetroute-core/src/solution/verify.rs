//! Postsolve checks.
//!
//! Engines are trusted to honour the model, but a cheap independent check
//! catches translation bugs at the boundary.

use thiserror::Error;

use super::{ExtractError, Route, Solution};
use crate::{CAPACITY, CumulVar, DEPOT, TIME};

const CUMUL_TOLERANCE: f64 = 1e-6;

/// A constraint violated by an extracted solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    /// Routes could not be extracted.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// A customer is not on any route.
    #[error("location {0} is not visited")]
    Unvisited(usize),
    /// A customer is visited more than once.
    #[error("location {0} is visited more than once")]
    DuplicateVisit(usize),
    /// A route does not start and end at the depot.
    #[error("route of vehicle {0} does not start and end at the depot")]
    DetachedRoute(usize),
    /// A vehicle carries more than its capacity.
    #[error("vehicle {vehicle} carries {load} but holds {capacity}")]
    CapacityExceeded {
        /// Overloaded vehicle.
        vehicle: usize,
        /// Load carried.
        load: u64,
        /// Vehicle capacity.
        capacity: u32,
    },
    /// The engine reported no arrival time for a time-windowed visit.
    #[error("no arrival time reported for location {0}")]
    MissingArrival(usize),
    /// A visit happens outside its window.
    #[error("location {location} served at {cumul}, outside [{min}, {max}]")]
    WindowViolated {
        /// Late or early location.
        location: usize,
        /// Reported cumulative time.
        cumul: f64,
        /// Window start in internal units.
        min: f64,
        /// Window end in internal units.
        max: f64,
    },
}

impl Solution<'_> {
    /// Check coverage, route endpoints, capacity loads and time windows.
    ///
    /// # Errors
    ///
    /// Returns the first [`VerificationError`] found.
    pub fn verify(&self) -> Result<(), VerificationError> {
        let routes = self.routes()?;
        check_endpoints(&routes)?;
        check_coverage(&routes, self.model().locations().len())?;
        if self.model().dimension(CAPACITY).is_some() {
            self.check_capacity(&routes)?;
        }
        if self.model().dimension(TIME).is_some() {
            self.check_windows()?;
        }
        Ok(())
    }

    fn check_capacity(&self, routes: &[Route]) -> Result<(), VerificationError> {
        for route in routes {
            let capacity = self
                .model()
                .vehicles()
                .get(route.vehicle)
                .and_then(|vehicle| vehicle.capacity);
            if let Some(capacity) = capacity
                && route.load > u64::from(capacity)
            {
                return Err(VerificationError::CapacityExceeded {
                    vehicle: route.vehicle,
                    load: route.load,
                    capacity,
                });
            }
        }
        Ok(())
    }

    fn check_windows(&self) -> Result<(), VerificationError> {
        let model = self.model();
        let Some(time) = model.dimension(TIME) else {
            return Ok(());
        };
        for (index, range) in time.ranges() {
            let location = model.manager().index_to_node(index).unwrap_or(DEPOT);
            let cumul = self
                .assignment()
                .cumul(&CumulVar::new(TIME, index))
                .ok_or(VerificationError::MissingArrival(location))?;
            if !range.contains(cumul, CUMUL_TOLERANCE) {
                return Err(VerificationError::WindowViolated {
                    location,
                    cumul,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

fn check_endpoints(routes: &[Route]) -> Result<(), VerificationError> {
    match routes
        .iter()
        .find(|route| route.stops.first() != Some(&DEPOT) || route.stops.last() != Some(&DEPOT))
    {
        Some(route) => Err(VerificationError::DetachedRoute(route.vehicle)),
        None => Ok(()),
    }
}

fn check_coverage(routes: &[Route], locations: usize) -> Result<(), VerificationError> {
    let mut visits = vec![0_usize; locations];
    for &customer in routes.iter().flat_map(Route::customers) {
        match visits.get_mut(customer) {
            Some(count) if customer != DEPOT => *count += 1,
            _ => return Err(VerificationError::DuplicateVisit(customer)),
        }
    }
    for (location, count) in visits.iter().enumerate().skip(1) {
        match count {
            0 => return Err(VerificationError::Unvisited(location)),
            1 => {}
            _ => return Err(VerificationError::DuplicateVisit(location)),
        }
    }
    Ok(())
}
