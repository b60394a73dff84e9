//! Routing model construction.
//!
//! [`RoutingModelBuilder`] validates the raw inputs and assembles a
//! [`RoutingModel`]: the index manager, the arc-cost transit, and the
//! dimensions selected by the [`DimensionPolicy`] plus an optional capacity
//! dimension. The finished model is immutable and may be shared across
//! threads; each engine call borrows it.

mod dimension;
mod error;

pub use dimension::{
    CAPACITY, CumulRange, CumulVar, DEFAULT_LIMIT, DISTANCE, Dimension, DimensionCapacity,
    DimensionPolicy, TIME, TimeWindowPolicy, Transit,
};
pub use error::ConfigurationError;

use geo::Coord;

use crate::{DEPOT, DistanceMatrix, IndexManager, Location, TimeWindow, Vehicle};

/// A fully specified routing problem ready for a
/// [`SolverEngine`](crate::SolverEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingModel {
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
    distances: DistanceMatrix,
    manager: IndexManager,
    policy: DimensionPolicy,
    dimensions: Vec<Dimension>,
    finalizer_objectives: Vec<CumulVar>,
}

impl RoutingModel {
    /// All locations, depot first.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// The fleet.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Number of vehicles.
    #[must_use]
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Pairwise travel costs between locations.
    #[must_use]
    pub const fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Location/index bijection.
    #[must_use]
    pub const fn manager(&self) -> &IndexManager {
        &self.manager
    }

    /// The route-length policy the model was built with.
    #[must_use]
    pub const fn policy(&self) -> &DimensionPolicy {
        &self.policy
    }

    /// Registered dimensions, in registration order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Look up a dimension by name.
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| dimension.name() == name)
    }

    /// Cumulative variables the engine should minimise once the primary
    /// cost is settled.
    #[must_use]
    pub fn finalizer_objectives(&self) -> &[CumulVar] {
        &self.finalizer_objectives
    }

    /// Route-start index of `vehicle`.
    #[must_use]
    pub const fn start(&self, vehicle: usize) -> Option<usize> {
        self.manager.start(vehicle)
    }

    /// Route-end index of `vehicle`.
    #[must_use]
    pub const fn end(&self, vehicle: usize) -> Option<usize> {
        self.manager.end(vehicle)
    }

    /// Whether `index` terminates a route.
    #[must_use]
    pub const fn is_end(&self, index: usize) -> bool {
        self.manager.is_end(index)
    }

    /// Arc cost between two route positions.
    #[must_use]
    pub fn arc_cost(&self, from_index: usize, to_index: usize) -> Option<f64> {
        let from = self.manager.index_to_node(from_index)?;
        let to = self.manager.index_to_node(to_index)?;
        self.distances.get(from, to)
    }

    /// Demand collected when leaving route position `index`.
    #[must_use]
    pub fn demand(&self, index: usize) -> Option<u32> {
        let node = self.manager.index_to_node(index)?;
        self.locations.get(node).map(|location| location.demand)
    }

    /// Demand transit of route position `index`, as seen by the capacity
    /// dimension.
    #[must_use]
    pub fn unary_transit(&self, index: usize) -> Option<f64> {
        self.demand(index).map(f64::from)
    }

    /// Transit of `dimension` between two route positions.
    #[must_use]
    pub fn transit(&self, dimension: &Dimension, from_index: usize, to_index: usize) -> Option<f64> {
        match dimension.transit() {
            Transit::Arc => self.arc_cost(from_index, to_index),
            Transit::Demand => self.unary_transit(from_index),
        }
    }

    /// Total arc cost of visiting `stops` in order.
    #[must_use]
    pub fn path_cost(&self, stops: &[usize]) -> Option<f64> {
        stops
            .windows(2)
            .map(|pair| match pair {
                [from, to] => self.distances.get(*from, *to),
                _ => None,
            })
            .sum()
    }
}

/// Validating builder for [`RoutingModel`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fleetroute_core::{
///     DimensionPolicy, DistanceBlend, DistanceMatrix, RoutingModelBuilder, CAPACITY, DISTANCE,
/// };
///
/// let positions = vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
///     Coord { x: 0.0, y: 1.0 },
/// ];
/// let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
/// let model = RoutingModelBuilder::new(positions, distances)
///     .vehicles(2)
///     .demands(vec![0, 2, 3])
///     .capacities(vec![4, 4])
///     .policy(DimensionPolicy::DistanceCap(10.0))
///     .build()?;
/// assert!(model.dimension(DISTANCE).is_some());
/// assert!(model.dimension(CAPACITY).is_some());
/// # Ok::<(), fleetroute_core::ConfigurationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RoutingModelBuilder {
    positions: Vec<Coord<f64>>,
    distances: DistanceMatrix,
    vehicles: usize,
    demands: Vec<u32>,
    capacities: Vec<u32>,
    policy: DimensionPolicy,
}

impl RoutingModelBuilder {
    /// Start from location positions and their cost matrix. Defaults to a
    /// single vehicle without dimensions.
    #[must_use]
    pub const fn new(positions: Vec<Coord<f64>>, distances: DistanceMatrix) -> Self {
        Self {
            positions,
            distances,
            vehicles: 1,
            demands: Vec::new(),
            capacities: Vec::new(),
            policy: DimensionPolicy::NoLimit,
        }
    }

    /// Fleet size.
    #[must_use]
    pub const fn vehicles(mut self, vehicles: usize) -> Self {
        self.vehicles = vehicles;
        self
    }

    /// Per-location demands, depot included.
    #[must_use]
    pub fn demands(mut self, demands: Vec<u32>) -> Self {
        self.demands = demands;
        self
    }

    /// Per-vehicle capacities. Enables the capacity dimension when
    /// non-empty.
    #[must_use]
    pub fn capacities(mut self, capacities: Vec<u32>) -> Self {
        self.capacities = capacities;
        self
    }

    /// Route-length policy.
    #[must_use]
    pub fn policy(mut self, policy: DimensionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate the inputs and assemble the model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when inputs are missing, mis-sized or
    /// out of range.
    pub fn build(self) -> Result<RoutingModel, ConfigurationError> {
        self.validate()?;
        let Self {
            positions,
            distances,
            vehicles,
            demands,
            capacities,
            policy,
        } = self;

        let manager = IndexManager::new(positions.len(), vehicles);
        let windows = match &policy {
            DimensionPolicy::TimeWindows(time) => time.windows.clone(),
            DimensionPolicy::NoLimit | DimensionPolicy::DistanceCap(_) => Vec::new(),
        };
        let locations = positions
            .into_iter()
            .enumerate()
            .map(|(id, position)| {
                let location = Location::new(id, position)
                    .with_demand(demands.get(id).copied().unwrap_or(0));
                match windows.get(id) {
                    Some(window) if id != DEPOT => location.with_window(*window),
                    _ => location,
                }
            })
            .collect();
        let fleet: Vec<Vehicle> = (0..vehicles)
            .map(|id| match capacities.get(id) {
                Some(capacity) => Vehicle::with_capacity(id, *capacity),
                None => Vehicle::new(id),
            })
            .collect();

        let mut dimensions = Vec::new();
        let mut finalizer_objectives = Vec::new();
        match &policy {
            DimensionPolicy::NoLimit => {}
            DimensionPolicy::DistanceCap(max) => {
                dimensions.push(
                    Dimension::new(DISTANCE, Transit::Arc, DimensionCapacity::Global(*max))
                        .fix_start_cumul_to_zero(true),
                );
            }
            DimensionPolicy::TimeWindows(time) => {
                let mut dimension = Dimension::new(
                    TIME,
                    Transit::Arc,
                    DimensionCapacity::Global(time.max_time),
                )
                .with_slack(time.max_wait);
                for (node, window) in time.windows.iter().enumerate().skip(1) {
                    if let Some(index) = manager.node_to_index(node) {
                        let (min, max) = window.scaled(time.speed);
                        dimension.set_range(index, CumulRange { min, max });
                    }
                }
                dimensions.push(dimension);
                for vehicle in 0..vehicles {
                    finalizer_objectives.extend(
                        [manager.start(vehicle), manager.end(vehicle)]
                            .into_iter()
                            .flatten()
                            .map(|index| CumulVar::new(TIME, index)),
                    );
                }
            }
        }
        if !capacities.is_empty() {
            dimensions.push(
                Dimension::new(
                    CAPACITY,
                    Transit::Demand,
                    DimensionCapacity::PerVehicle(capacities.iter().copied().map(f64::from).collect()),
                )
                .fix_start_cumul_to_zero(true),
            );
        }
        for dimension in &dimensions {
            log::debug!(
                "registered dimension {} (fixed start: {}, explicit ranges: {})",
                dimension.name(),
                dimension.start_fixed_at_zero(),
                dimension.ranges().count()
            );
        }

        Ok(RoutingModel {
            locations,
            vehicles: fleet,
            distances,
            manager,
            policy,
            dimensions,
            finalizer_objectives,
        })
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let n = self.positions.len();
        if n == 0 {
            return Err(ConfigurationError::NoLocations);
        }
        expect_len("distance matrix", n, self.distances.len())?;
        if self.vehicles == 0 {
            return Err(ConfigurationError::NoVehicles);
        }
        if !self.capacities.is_empty() {
            if self.demands.is_empty() {
                return Err(ConfigurationError::CapacitiesWithoutDemands);
            }
            expect_len("capacities", self.vehicles, self.capacities.len())?;
        }
        if !self.demands.is_empty() {
            expect_len("demands", n, self.demands.len())?;
        }
        match &self.policy {
            DimensionPolicy::NoLimit => Ok(()),
            DimensionPolicy::DistanceCap(max) => expect_limit("maximum distance", *max),
            DimensionPolicy::TimeWindows(time) => validate_time_windows(time, n),
        }
    }
}

fn expect_len(what: &'static str, expected: usize, actual: usize) -> Result<(), ConfigurationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ConfigurationError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

fn expect_limit(what: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidLimit { what, value })
    }
}

fn validate_time_windows(time: &TimeWindowPolicy, n: usize) -> Result<(), ConfigurationError> {
    expect_len("time windows", n, time.windows.len())?;
    if !(time.speed.is_finite() && time.speed > 0.0) {
        return Err(ConfigurationError::InvalidSpeed(time.speed));
    }
    expect_limit("maximum time", time.max_time)?;
    expect_limit("maximum wait", time.max_wait)?;
    let invalid = time
        .windows
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, window)| !window_is_valid(window));
    match invalid {
        Some((location, window)) => Err(ConfigurationError::InvalidWindow {
            location,
            earliest: window.earliest,
            latest: window.latest,
        }),
        None => Ok(()),
    }
}

fn window_is_valid(window: &TimeWindow) -> bool {
    window.earliest.is_finite() && !window.latest.is_nan() && window.earliest <= window.latest
}
