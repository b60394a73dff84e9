//! `vrp-core` modelling helpers for `VrpEngine`.
//!
//! This module converts a [`RoutingModel`] into a `vrp-core` problem, runs the
//! solver, and translates the resulting tours back into an [`Assignment`].
//! Travel time is measured in distance units, so the matrix serves as both
//! the distance and the duration source.

use std::sync::Arc;

use fleetroute_core::{
    Assignment, CAPACITY, DEPOT, DISTANCE, DistanceMatrix, EngineError, RoutingModel, TIME,
};
use vrp_core::models::common::{Location, Profile, TimeWindow as VrpTimeWindow};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

custom_dimension!(FleetIndex typeof usize);

/// Which optional `vrp-core` features the model needs.
#[derive(Debug, Clone, Copy)]
struct Features {
    capacity: bool,
    time_constrained: bool,
    finalizers: bool,
}

impl Features {
    fn of(model: &RoutingModel) -> Self {
        Self {
            capacity: model.dimension(CAPACITY).is_some(),
            time_constrained: model.dimension(DISTANCE).is_some()
                || model.dimension(TIME).is_some(),
            finalizers: !model.finalizer_objectives().is_empty(),
        }
    }
}

/// Reject models whose loads or objectives `vrp-core` cannot express.
fn check_supported(model: &RoutingModel) -> Result<(), EngineError> {
    let limit = i32::MAX.unsigned_abs();
    if let Some(location) = model
        .locations()
        .iter()
        .find(|location| location.demand > limit)
    {
        return Err(EngineError::Unsupported(format!(
            "demand {} of location {} exceeds {limit}",
            location.demand, location.id
        )));
    }
    if let Some((vehicle, capacity)) = model
        .vehicles()
        .iter()
        .filter_map(|vehicle| vehicle.capacity.map(|capacity| (vehicle.id, capacity)))
        .find(|&(_, capacity)| capacity > limit)
    {
        return Err(EngineError::Unsupported(format!(
            "capacity {capacity} of vehicle {vehicle} exceeds {limit}"
        )));
    }
    if let Some(var) = model
        .finalizer_objectives()
        .iter()
        .find(|var| var.dimension != TIME)
    {
        return Err(EngineError::Unsupported(format!(
            "finalizer objective on dimension {}",
            var.dimension
        )));
    }
    Ok(())
}

fn define_goal(
    transport: Arc<dyn TransportCost>,
    features: Features,
) -> GenericResult<GoalContext> {
    let mut all = vec![MinimizeUnassignedBuilder::new("min-unassigned").build()?];
    all.push(
        TransportFeatureBuilder::new("min-distance")
            .set_transport_cost(transport.clone())
            .set_time_constrained(features.time_constrained)
            .build_minimize_distance()?,
    );
    if features.capacity {
        all.push(CapacityFeatureBuilder::<SingleDimLoad>::new("capacity").build()?);
    }
    if features.finalizers {
        // Start and end times are minimised after distance, as a tie-breaker.
        all.push(
            TransportFeatureBuilder::new("min-duration")
                .set_transport_cost(transport)
                .set_time_constrained(false)
                .build_minimize_duration()?,
        );
    }
    GoalContextBuilder::with_features(all.as_slice())?.build()
}

fn define_jobs(model: &RoutingModel, features: Features) -> GenericResult<Vec<Job>> {
    let time = model.dimension(TIME);
    model
        .manager()
        .customer_indices()
        .filter_map(|index| model.manager().index_to_node(index).map(|node| (index, node)))
        .map(|(index, node)| {
            let mut builder = SingleBuilder::default().id(format!("location{node}").as_str());
            if features.capacity {
                let amount = model.demand(index).unwrap_or(0);
                let amount = i32::try_from(amount)
                    .map_err(|_| format!("demand {amount} of location {node} is too large"))?;
                let demand: Demand<SingleDimLoad> = Demand::delivery(amount);
                builder = builder.demand(demand);
            }
            if let Some(range) = time.and_then(|dimension| dimension.range(index)) {
                let latest = if range.max.is_finite() {
                    range.max
                } else {
                    f64::MAX
                };
                builder = builder.times(vec![VrpTimeWindow::new(range.min, latest)])?;
            }
            builder.location(node)?.build_as_job()
        })
        .collect()
}

fn define_vehicles(model: &RoutingModel, features: Features) -> GenericResult<Vec<Vehicle>> {
    let depot_demand = model
        .locations()
        .first()
        .map_or(0, |depot| depot.demand);
    let shift = [DISTANCE, TIME]
        .into_iter()
        .find_map(|name| model.dimension(name));
    model
        .vehicles()
        .iter()
        .map(|vehicle| {
            let mut detail = VehicleDetailBuilder::default()
                .set_start_location(DEPOT)
                .set_end_location(DEPOT);
            if let Some(limit) = shift.and_then(|dimension| dimension.capacity_for(vehicle.id)) {
                detail = detail.set_start_time(0.0).set_end_time(limit);
            }
            let fleet_index = vehicle.id;
            let mut builder = VehicleBuilder::default()
                .id(format!("vehicle{fleet_index}").as_str())
                .add_detail(detail.build()?)
                .dimension(|dimens| {
                    dimens.set_fleet_index(fleet_index);
                });
            if features.capacity {
                // The depot's demand is loaded before the first customer.
                let capacity = vehicle.capacity.unwrap_or(0).saturating_sub(depot_demand);
                let capacity = i32::try_from(capacity).map_err(|_| {
                    format!("capacity {capacity} of vehicle {fleet_index} is too large")
                })?;
                builder = builder.capacity(SingleDimLoad::new(capacity));
            }
            builder.build()
        })
        .collect()
}

fn define_problem(
    model: &RoutingModel,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
    features: Features,
) -> GenericResult<Problem> {
    let jobs = define_jobs(model, features)?;
    let vehicles = define_vehicles(model, features)?;
    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(vehicles.into_iter())
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

struct MatrixTransportCost {
    costs: Vec<Vec<f64>>,
}

impl MatrixTransportCost {
    fn new(distances: &DistanceMatrix) -> Self {
        Self {
            costs: distances.rows().map(<[f64]>::to_vec).collect(),
        }
    }

    fn cost(&self, from: Location, to: Location) -> f64 {
        let result = self.costs.get(from).and_then(|row| row.get(to)).copied();
        debug_assert!(result.is_some(), "Matrix lookup failed: from={from}, to={to}");
        result.unwrap_or(0.0)
    }
}

impl TransportCost for MatrixTransportCost {
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.cost(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.cost(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }
}

/// Search budget for a single `vrp-core` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Budget {
    pub(crate) max_generations: usize,
    pub(crate) max_seconds: Option<usize>,
}

/// Solve `model` with `vrp-core`.
///
/// Returns `Ok(None)` when any customer stays unassigned.
pub(crate) fn solve(
    model: &RoutingModel,
    budget: Budget,
) -> Result<Option<Assignment>, EngineError> {
    check_supported(model)?;
    let features = Features::of(model);
    let transport: Arc<dyn TransportCost> = Arc::new(MatrixTransportCost::new(model.distances()));
    let goal = define_goal(transport.clone(), features)
        .map_err(|err| EngineError::Model(err.to_string()))?;
    let problem = Arc::new(
        define_problem(model, transport, goal, features)
            .map_err(|err| EngineError::Model(err.to_string()))?,
    );

    let config = VrpConfigBuilder::new(problem.clone())
        .prebuild()
        .map_err(|err| EngineError::Model(err.to_string()))?
        .with_max_time(budget.max_seconds)
        .with_max_generations(Some(budget.max_generations))
        .build()
        .map_err(|err| EngineError::Model(err.to_string()))?;

    let solution = vrp_core::solver::Solver::new(problem, config)
        .solve()
        .map_err(|err| EngineError::Search(err.to_string()))?;

    if !solution.unassigned.is_empty() {
        log::info!(
            "vrp-core left {} of {} customers unassigned",
            solution.unassigned.len(),
            model.locations().len().saturating_sub(1)
        );
        return Ok(None);
    }

    let manager = model.manager();
    let mut visits = vec![Vec::new(); model.num_vehicles()];
    let mut times = vec![None; manager.len()];
    for route in &solution.routes {
        let Some(&vehicle) = route.actor.vehicle.dimens.get_fleet_index() else {
            return Err(EngineError::Search("route without a fleet vehicle".to_owned()));
        };
        let activities: Vec<_> = route.tour.all_activities().collect();
        if let (Some(first), Some(slot)) = (
            activities.first(),
            manager.start(vehicle).and_then(|index| times.get_mut(index)),
        ) {
            *slot = Some(first.schedule.departure);
        }
        if let (Some(last), Some(slot)) = (
            activities.last(),
            manager.end(vehicle).and_then(|index| times.get_mut(index)),
        ) {
            *slot = Some(last.schedule.arrival);
        }
        let served = activities.iter().filter(|activity| activity.job.is_some());
        for activity in served {
            let node = activity.place.location;
            if let Some(stops) = visits.get_mut(vehicle) {
                stops.push(node);
            }
            if let Some(slot) = manager.node_to_index(node).and_then(|index| times.get_mut(index)) {
                *slot = Some(activity.schedule.departure);
            }
        }
    }

    let assignment = Assignment::from_visits(model, &visits)?;
    Ok(Some(if model.dimension(TIME).is_some() {
        assignment.with_cumuls(TIME, times)
    } else {
        assignment
    }))
}
