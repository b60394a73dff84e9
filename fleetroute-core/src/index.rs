//! Bijection between location ids and route-position indices.
//!
//! Engines reason about route positions rather than locations: each vehicle
//! owns a distinct start and end index, both of which stand for the depot.
//! Index space is laid out as
//!
//! ```text
//! [0, v)               vehicle starts
//! [v, v + n - 1)       customers 1..n, in order
//! [v + n - 1, n - 1 + 2v)  vehicle ends
//! ```

use std::ops::Range;

use crate::DEPOT;

/// Stateless mapping between locations and route-position indices.
///
/// # Examples
/// ```
/// use fleetroute_core::IndexManager;
///
/// let manager = IndexManager::new(4, 2);
/// assert_eq!(manager.len(), 7);
/// assert_eq!(manager.start(1), Some(1));
/// assert_eq!(manager.node_to_index(1), Some(2));
/// assert_eq!(manager.index_to_node(2), Some(1));
/// assert_eq!(manager.index_to_node(manager.end(0).unwrap()), Some(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexManager {
    locations: usize,
    vehicles: usize,
}

/// Role an index plays in a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Start of the given vehicle's route.
    Start(usize),
    /// Visit to the given customer location.
    Customer(usize),
    /// End of the given vehicle's route.
    End(usize),
}

impl IndexManager {
    /// Create a manager for `locations` locations (depot included) and
    /// `vehicles` vehicles.
    #[must_use]
    pub const fn new(locations: usize, vehicles: usize) -> Self {
        Self {
            locations,
            vehicles,
        }
    }

    /// Number of locations, depot included.
    #[must_use]
    pub const fn num_locations(&self) -> usize {
        self.locations
    }

    /// Number of vehicles.
    #[must_use]
    pub const fn num_vehicles(&self) -> usize {
        self.vehicles
    }

    const fn customers(&self) -> usize {
        self.locations.saturating_sub(1)
    }

    /// Size of the index space.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.customers() + 2 * self.vehicles
    }

    /// Whether the index space is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Route-start index of `vehicle`.
    #[must_use]
    pub const fn start(&self, vehicle: usize) -> Option<usize> {
        if vehicle < self.vehicles {
            Some(vehicle)
        } else {
            None
        }
    }

    /// Route-end index of `vehicle`.
    #[must_use]
    pub const fn end(&self, vehicle: usize) -> Option<usize> {
        if vehicle < self.vehicles {
            Some(self.vehicles + self.customers() + vehicle)
        } else {
            None
        }
    }

    /// Classify `index`.
    #[must_use]
    pub const fn kind(&self, index: usize) -> Option<IndexKind> {
        let first_customer = self.vehicles;
        let first_end = self.vehicles + self.customers();
        if index < first_customer {
            Some(IndexKind::Start(index))
        } else if index < first_end {
            Some(IndexKind::Customer(index - first_customer + 1))
        } else if index < self.len() {
            Some(IndexKind::End(index - first_end))
        } else {
            None
        }
    }

    /// Whether `index` is a route-start sentinel.
    #[must_use]
    pub const fn is_start(&self, index: usize) -> bool {
        matches!(self.kind(index), Some(IndexKind::Start(_)))
    }

    /// Whether `index` is a route-end sentinel.
    #[must_use]
    pub const fn is_end(&self, index: usize) -> bool {
        matches!(self.kind(index), Some(IndexKind::End(_)))
    }

    /// Location visited at `index`; starts and ends map to the depot.
    #[must_use]
    pub const fn index_to_node(&self, index: usize) -> Option<usize> {
        match self.kind(index) {
            Some(IndexKind::Start(_) | IndexKind::End(_)) => Some(DEPOT),
            Some(IndexKind::Customer(node)) => Some(node),
            None => None,
        }
    }

    /// Index visiting customer `node`. The depot has one index per vehicle
    /// start and end, so it has no single index and yields `None`.
    #[must_use]
    pub const fn node_to_index(&self, node: usize) -> Option<usize> {
        if node == DEPOT || node >= self.locations {
            None
        } else {
            Some(self.vehicles + node - 1)
        }
    }

    /// Indices of every customer visit, in location order.
    #[must_use]
    pub const fn customer_indices(&self) -> Range<usize> {
        self.vehicles..self.vehicles + self.customers()
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect for readable failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn single_vehicle_layout() {
        let manager = IndexManager::new(4, 1);
        assert_eq!(manager.len(), 5);
        assert_eq!(manager.kind(0), Some(IndexKind::Start(0)));
        assert_eq!(manager.kind(1), Some(IndexKind::Customer(1)));
        assert_eq!(manager.kind(3), Some(IndexKind::Customer(3)));
        assert_eq!(manager.kind(4), Some(IndexKind::End(0)));
        assert_eq!(manager.kind(5), None);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 2)]
    #[case(6, 4)]
    fn customers_round_trip(#[case] vehicles: usize, #[case] node: usize) {
        let manager = IndexManager::new(7, vehicles);
        let index = manager.node_to_index(node).expect("customer has an index");
        assert_eq!(manager.index_to_node(index), Some(node));
    }

    #[rstest]
    fn depot_has_no_single_index() {
        let manager = IndexManager::new(3, 2);
        assert_eq!(manager.node_to_index(DEPOT), None);
        assert_eq!(manager.node_to_index(3), None);
    }

    #[rstest]
    fn sentinels_map_to_depot() {
        let manager = IndexManager::new(5, 3);
        for vehicle in 0..3 {
            let start = manager.start(vehicle).expect("start exists");
            let end = manager.end(vehicle).expect("end exists");
            assert!(manager.is_start(start));
            assert!(manager.is_end(end));
            assert_eq!(manager.index_to_node(start), Some(DEPOT));
            assert_eq!(manager.index_to_node(end), Some(DEPOT));
        }
        assert_eq!(manager.start(3), None);
        assert_eq!(manager.end(3), None);
    }

    #[rstest]
    fn depot_only_problem_has_sentinels_only() {
        let manager = IndexManager::new(1, 2);
        assert_eq!(manager.len(), 4);
        assert_eq!(manager.customer_indices().count(), 0);
        assert_eq!(manager.end(0), Some(2));
    }
}
