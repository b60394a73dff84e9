//! Facade crate for the fleetroute vehicle routing toolkit.
//!
//! This crate re-exports the problem formulation from `fleetroute-core` and
//! exposes the `vrp-core` backed engine behind the `solver-vrp` feature.
//!
//! ```
//! # #[cfg(feature = "solver-vrp")]
//! # {
//! use fleetroute::{ProblemConfig, SearchController, VrpEngine};
//!
//! let instance = ProblemConfig::new(6).with_seed(3).build()?;
//! let controller = SearchController::new(&instance.model, VrpEngine::new());
//! if let Some(solution) = controller.solve()? {
//!     assert!(solution.verify().is_ok());
//! }
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub use fleetroute_core::{
    Assignment, CAPACITY, CUSTOMER_NODE_SIZE, Colour, ConfigurationError, CumulRange, CumulVar,
    DEFAULT_LIMIT, DEPOT, DEPOT_NODE_SIZE, DISTANCE, Dimension, DimensionCapacity,
    DimensionPolicy, DistanceBlend, DistanceMatrix, EngineError, ExtractError, IndexKind,
    IndexManager, Instance, Location, Metaheuristic, Palette, ProblemConfig, RenderEdge,
    RenderGraph, Route, RouteEdge, RoutingModel, RoutingModelBuilder, ScoreError,
    SearchController, SearchParameters, Solution, SolverEngine, TIME, TimeWindow,
    TimeWindowPolicy, Transit, Vehicle, VerificationError, distance_saving, random_positions,
};

#[cfg(feature = "solver-vrp")]
pub use fleetroute_solver_vrp::{VrpEngine, VrpEngineConfig};
