//! Core problem formulation for capacitated, time-windowed vehicle routing.
//!
//! The crate turns planar coordinates, demands, capacities and time windows
//! into a [`RoutingModel`]: a distance matrix, an explicit [`IndexManager`]
//! between locations and route positions, and the dimensions selected by a
//! [`DimensionPolicy`]. The combinatorial search itself is delegated to a
//! [`SolverEngine`]; this crate drives it through a [`SearchController`],
//! extracts routes from the returned [`Assignment`], scores them against
//! naive round trips, verifies them, and prepares a [`RenderGraph`] for
//! external drawing.
//!
//! ```
//! use fleetroute_core::ProblemConfig;
//!
//! let instance = ProblemConfig::new(10).with_vehicles(3).with_seed(1).build()?;
//! assert_eq!(instance.model.manager().len(), 10 - 1 + 2 * 3);
//! # Ok::<(), fleetroute_core::ConfigurationError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod colour;
mod distance;
mod engine;
mod index;
mod instance;
mod location;
mod model;
mod render;
mod search;
mod solution;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use colour::{Colour, Palette};
pub use distance::{DistanceBlend, DistanceMatrix};
pub use engine::{Assignment, EngineError, SolverEngine};
pub use index::{IndexKind, IndexManager};
pub use instance::{Instance, ProblemConfig, random_positions};
pub use location::{DEPOT, Location, TimeWindow, Vehicle};
pub use model::{
    CAPACITY, ConfigurationError, CumulRange, CumulVar, DEFAULT_LIMIT, DISTANCE, Dimension,
    DimensionCapacity, DimensionPolicy, RoutingModel, RoutingModelBuilder, TIME,
    TimeWindowPolicy, Transit,
};
pub use render::{CUSTOMER_NODE_SIZE, DEPOT_NODE_SIZE, RenderEdge, RenderGraph};
pub use search::{Metaheuristic, SearchController, SearchParameters};
pub use solution::{
    ExtractError, Route, RouteEdge, ScoreError, Solution, VerificationError, distance_saving,
};
