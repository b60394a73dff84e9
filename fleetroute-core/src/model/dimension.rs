//! Cumulative resources tracked along each route.

use crate::TimeWindow;

/// Name of the per-vehicle travel distance dimension.
pub const DISTANCE: &str = "Distance";
/// Name of the arrival time dimension.
pub const TIME: &str = "Time";
/// Name of the vehicle load dimension.
pub const CAPACITY: &str = "Capacity";

/// Default upper bound on any cumulative value (`2^31`).
pub const DEFAULT_LIMIT: f64 = 2_147_483_648.0;

/// How a dimension accumulates between consecutive route positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transit {
    /// Grows by the arc cost between the two positions.
    Arc,
    /// Grows by the demand of the position being left.
    Demand,
}

/// Upper bound on a dimension's cumulative value.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionCapacity {
    /// Same bound for every vehicle.
    Global(f64),
    /// One bound per vehicle, indexed by vehicle id.
    PerVehicle(Vec<f64>),
}

/// Feasible interval for a cumulative variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CumulRange {
    /// Lower bound, inclusive.
    pub min: f64,
    /// Upper bound, inclusive.
    pub max: f64,
}

impl CumulRange {
    /// Whether `value` lies within the range, allowing `tolerance` either side.
    #[must_use]
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.min - tolerance && value <= self.max + tolerance
    }
}

/// Reference to the cumulative variable of `dimension` at route position
/// `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulVar {
    /// Dimension name.
    pub dimension: String,
    /// Route-position index.
    pub index: usize,
}

impl CumulVar {
    /// Construct a reference.
    #[must_use]
    pub fn new(dimension: &str, index: usize) -> Self {
        Self {
            dimension: dimension.to_owned(),
            index,
        }
    }
}

/// A named cumulative resource.
///
/// # Examples
/// ```
/// use fleetroute_core::{Dimension, DimensionCapacity, Transit};
///
/// let dimension = Dimension::new("Distance", Transit::Arc, DimensionCapacity::Global(100.0))
///     .fix_start_cumul_to_zero(true);
/// assert_eq!(dimension.capacity_for(3), Some(100.0));
/// assert!(dimension.start_fixed_at_zero());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    name: String,
    transit: Transit,
    slack_max: f64,
    capacity: DimensionCapacity,
    fix_start_cumul_to_zero: bool,
    ranges: Vec<(usize, CumulRange)>,
}

impl Dimension {
    /// Create a dimension with no slack and no per-index ranges.
    #[must_use]
    pub fn new(name: &str, transit: Transit, capacity: DimensionCapacity) -> Self {
        Self {
            name: name.to_owned(),
            transit,
            slack_max: 0.0,
            capacity,
            fix_start_cumul_to_zero: false,
            ranges: Vec::new(),
        }
    }

    /// Allow up to `slack_max` of idle accumulation per visit, e.g. waiting.
    #[must_use]
    pub const fn with_slack(mut self, slack_max: f64) -> Self {
        self.slack_max = slack_max;
        self
    }

    /// Force every vehicle's start cumul to zero.
    #[must_use]
    pub const fn fix_start_cumul_to_zero(mut self, fixed: bool) -> Self {
        self.fix_start_cumul_to_zero = fixed;
        self
    }

    /// Restrict the cumulative variable at `index` to `range`.
    pub fn set_range(&mut self, index: usize, range: CumulRange) {
        match self.ranges.iter_mut().find(|(idx, _)| *idx == index) {
            Some(slot) => slot.1 = range,
            None => self.ranges.push((index, range)),
        }
    }

    /// Dimension name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transit kind.
    #[must_use]
    pub const fn transit(&self) -> Transit {
        self.transit
    }

    /// Maximum slack per visit.
    #[must_use]
    pub const fn slack_max(&self) -> f64 {
        self.slack_max
    }

    /// Capacity definition.
    #[must_use]
    pub const fn capacity(&self) -> &DimensionCapacity {
        &self.capacity
    }

    /// Whether start cumuls are pinned to zero.
    #[must_use]
    pub const fn start_fixed_at_zero(&self) -> bool {
        self.fix_start_cumul_to_zero
    }

    /// Capacity bound for `vehicle`.
    #[must_use]
    pub fn capacity_for(&self, vehicle: usize) -> Option<f64> {
        match &self.capacity {
            DimensionCapacity::Global(limit) => Some(*limit),
            DimensionCapacity::PerVehicle(limits) => limits.get(vehicle).copied(),
        }
    }

    /// Explicit range set at `index`, if any.
    #[must_use]
    pub fn range(&self, index: usize) -> Option<CumulRange> {
        self.ranges
            .iter()
            .find(|(idx, _)| *idx == index)
            .map(|(_, range)| *range)
    }

    /// All explicit ranges, keyed by index.
    pub fn ranges(&self) -> impl Iterator<Item = (usize, CumulRange)> + '_ {
        self.ranges.iter().copied()
    }
}

/// Which route-length dimension a model carries.
///
/// A model enforces at most one of a distance cap and time windows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DimensionPolicy {
    /// Routes may be arbitrarily long.
    #[default]
    NoLimit,
    /// Bound each vehicle's cumulative travel distance.
    DistanceCap(f64),
    /// Serve each location inside its time window.
    TimeWindows(TimeWindowPolicy),
}

/// Parameters of the time-window dimension.
///
/// Time is measured in distance units: a vehicle travelling at `speed`
/// scale-units per hour reaches hour `h` at cumulative time `h · speed`.
///
/// # Examples
/// ```
/// use fleetroute_core::{TimeWindow, TimeWindowPolicy};
///
/// let policy = TimeWindowPolicy::new(vec![TimeWindow::unconstrained(); 3], 1000.0)
///     .with_max_wait(50.0);
/// assert_eq!(policy.speed, 1000.0);
/// assert_eq!(policy.max_wait, 50.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindowPolicy {
    /// One window per location, depot included; the depot entry is ignored.
    pub windows: Vec<TimeWindow>,
    /// Scale-units travelled per hour.
    pub speed: f64,
    /// Upper bound on any vehicle's cumulative time.
    pub max_time: f64,
    /// Maximum waiting allowed at a single visit.
    pub max_wait: f64,
}

impl TimeWindowPolicy {
    /// Windows at `speed` with default time and waiting bounds.
    #[must_use]
    pub const fn new(windows: Vec<TimeWindow>, speed: f64) -> Self {
        Self {
            windows,
            speed,
            max_time: DEFAULT_LIMIT,
            max_wait: 1_000_000.0,
        }
    }

    /// Override the bound on cumulative time.
    #[must_use]
    pub const fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }

    /// Override the waiting allowance.
    #[must_use]
    pub const fn with_max_wait(mut self, max_wait: f64) -> Self {
        self.max_wait = max_wait;
        self
    }
}
