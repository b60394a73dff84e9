//! Native vehicle routing engine for fleetroute.
//!
//! This crate provides [`VrpEngine`], an implementation of the
//! [`SolverEngine`](fleetroute_core::SolverEngine) trait backed by the
//! `vrp-core` metaheuristics. It maps a
//! [`RoutingModel`](fleetroute_core::RoutingModel) onto one `vrp-core` job per
//! customer and one vehicle per fleet member, then reads the best tours back
//! into an [`Assignment`](fleetroute_core::Assignment).
//!
//! Distance limits and time windows become vehicle shift bounds and job time
//! windows respectively, with travel time measured in distance units.
//! Capacities become single-dimension loads. Unassigned customers are
//! reported as an infeasible solve.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod vrp;

pub use engine::{VrpEngine, VrpEngineConfig};
