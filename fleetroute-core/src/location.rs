//! Locations, vehicles and time windows.
//!
//! Location `0` is always the depot. Every vehicle starts and ends its route
//! there.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of the depot location.
pub const DEPOT: usize = 0;

/// A window of acceptable service times, expressed in hours from time zero.
///
/// # Examples
/// ```
/// use fleetroute_core::TimeWindow;
///
/// let window = TimeWindow::new(1.0, 2.0);
/// assert!(window.is_bounded());
/// assert!(!TimeWindow::unconstrained().is_bounded());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeWindow {
    /// Earliest service time in hours.
    pub earliest: f64,
    /// Latest service time in hours.
    pub latest: f64,
}

impl TimeWindow {
    /// Construct a window from its bounds in hours.
    #[must_use]
    pub const fn new(earliest: f64, latest: f64) -> Self {
        Self { earliest, latest }
    }

    /// A window that never constrains service.
    #[must_use]
    pub const fn unconstrained() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// Whether the window narrows the feasible range at all.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.earliest > 0.0 || self.latest.is_finite()
    }

    /// Convert the bounds from hours into internal units at `speed`
    /// scale-units per hour.
    ///
    /// ```
    /// use fleetroute_core::TimeWindow;
    ///
    /// assert_eq!(TimeWindow::new(1.0, 2.0).scaled(1000.0), (1000.0, 2000.0));
    /// ```
    #[must_use]
    pub fn scaled(&self, speed: f64) -> (f64, f64) {
        (self.earliest * speed, self.latest * speed)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::unconstrained()
    }
}

/// A place that must be visited, or the depot when `id == 0`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fleetroute_core::Location;
///
/// let depot = Location::new(0, Coord { x: 0.0, y: 0.0 });
/// assert!(depot.is_depot());
/// assert_eq!(depot.demand, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Dense identifier in `[0, n)`.
    pub id: usize,
    /// Planar position.
    pub position: Coord<f64>,
    /// Units picked up at this location.
    pub demand: u32,
    /// Service window in hours.
    pub window: TimeWindow,
}

impl Location {
    /// Construct a location with no demand and an unconstrained window.
    #[must_use]
    pub fn new(id: usize, position: Coord<f64>) -> Self {
        Self {
            id,
            position,
            demand: 0,
            window: TimeWindow::unconstrained(),
        }
    }

    /// Set the demand.
    #[must_use]
    pub const fn with_demand(mut self, demand: u32) -> Self {
        self.demand = demand;
        self
    }

    /// Set the service window.
    #[must_use]
    pub const fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// Whether this is the depot.
    #[must_use]
    pub const fn is_depot(&self) -> bool {
        self.id == DEPOT
    }
}

/// A fleet member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    /// Dense identifier in `[0, v)`.
    pub id: usize,
    /// Maximum load carried, or `None` when unconstrained.
    pub capacity: Option<u32>,
}

impl Vehicle {
    /// Construct an unconstrained vehicle.
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self { id, capacity: None }
    }

    /// Construct a vehicle with a load limit.
    #[must_use]
    pub const fn with_capacity(id: usize, capacity: u32) -> Self {
        Self {
            id,
            capacity: Some(capacity),
        }
    }
}
