use thiserror::Error;

/// Errors raised while assembling a [`RoutingModel`](crate::RoutingModel).
///
/// Every variant is detected at build time so that engines never see a
/// malformed model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The problem has no locations, not even a depot.
    #[error("at least one location (the depot) is required")]
    NoLocations,
    /// The fleet is empty.
    #[error("at least one vehicle is required")]
    NoVehicles,
    /// Vehicle capacities were given without per-location demands.
    #[error("vehicle capacities require per-location demands")]
    CapacitiesWithoutDemands,
    /// An input vector does not match the size it describes.
    #[error("{what} has {actual} entries but {expected} were expected")]
    LengthMismatch {
        /// Which input was mis-sized.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// The distance blend factor is NaN or infinite.
    #[error("distance blend factor must be finite, got {0}")]
    NonFiniteBlend(f64),
    /// The vehicle speed is not a positive finite number.
    #[error("vehicle speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),
    /// A dimension bound is negative or NaN.
    #[error("{what} must be a non-negative number, got {value}")]
    InvalidLimit {
        /// Which bound was rejected.
        what: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A time window closes before it opens.
    #[error("time window of location {location} is invalid: [{earliest}, {latest}]")]
    InvalidWindow {
        /// Offending location id.
        location: usize,
        /// Window start in hours.
        earliest: f64,
        /// Window end in hours.
        latest: f64,
    },
}
