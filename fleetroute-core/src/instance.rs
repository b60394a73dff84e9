//! Problem construction from high-level parameters.
//!
//! [`ProblemConfig`] gathers the knobs of a routing problem, fills in seeded
//! random coordinates and colours where none are supplied, and picks the
//! [`DimensionPolicy`] from the fleet size and the presence of windows.

use geo::Coord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ConfigurationError, DEFAULT_LIMIT, DEPOT, DimensionPolicy, DistanceBlend, DistanceMatrix,
    Palette, RoutingModel, RoutingModelBuilder, TimeWindow, TimeWindowPolicy,
};

/// Parameters of a routing problem.
///
/// # Examples
/// ```
/// use fleetroute_core::{DISTANCE, ProblemConfig};
///
/// let instance = ProblemConfig::new(6).with_vehicles(2).with_seed(3).build()?;
/// assert_eq!(instance.model.locations().len(), 6);
/// assert!(instance.model.dimension(DISTANCE).is_some());
/// assert_eq!(instance.palette.len(), 2);
/// # Ok::<(), fleetroute_core::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProblemConfig {
    /// Number of locations, depot included.
    pub locations: usize,
    /// Fleet size.
    pub vehicles: usize,
    /// Longest distance a vehicle may travel; also bounds route time.
    pub max_distance: f64,
    /// Side of the square random positions are drawn from.
    pub scale: f64,
    /// Explicit positions; random when `None`.
    pub positions: Option<Vec<Coord<f64>>>,
    /// Per-vehicle capacities; empty disables the capacity dimension.
    pub capacities: Vec<u32>,
    /// Per-location demands.
    pub demands: Vec<u32>,
    /// Per-location windows in hours; empty disables windows.
    pub windows: Vec<TimeWindow>,
    /// Scale units travelled per hour.
    pub speed: f64,
    /// Manhattan weight of the distance blend.
    pub blend: f64,
    /// Seed for positions and colours.
    pub seed: u64,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            locations: 0,
            vehicles: 1,
            max_distance: DEFAULT_LIMIT,
            scale: 1000.0,
            positions: None,
            capacities: Vec::new(),
            demands: Vec::new(),
            windows: Vec::new(),
            speed: 1000.0,
            blend: 0.0,
            seed: 0,
        }
    }
}

/// A built model together with its display palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// The routing problem.
    pub model: RoutingModel,
    /// One colour per vehicle.
    pub palette: Palette,
}

impl ProblemConfig {
    /// Defaults for `locations` locations.
    #[must_use]
    pub fn new(locations: usize) -> Self {
        Self {
            locations,
            ..Self::default()
        }
    }

    /// Set the fleet size.
    #[must_use]
    pub const fn with_vehicles(mut self, vehicles: usize) -> Self {
        self.vehicles = vehicles;
        self
    }

    /// Set the per-vehicle travel limit.
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the side of the random placement square.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Use explicit positions instead of random ones.
    #[must_use]
    pub fn with_positions(mut self, positions: Vec<Coord<f64>>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Enable the capacity dimension.
    #[must_use]
    pub fn with_capacities(mut self, capacities: Vec<u32>, demands: Vec<u32>) -> Self {
        self.capacities = capacities;
        self.demands = demands;
        self
    }

    /// Attach time windows in hours.
    #[must_use]
    pub fn with_windows(mut self, windows: Vec<TimeWindow>) -> Self {
        self.windows = windows;
        self
    }

    /// Set the travel speed.
    #[must_use]
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the Manhattan weight of the distance blend.
    #[must_use]
    pub const fn with_blend(mut self, blend: f64) -> Self {
        self.blend = blend;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Route-length policy implied by the fleet size and windows.
    ///
    /// A single vehicle never gets a route-length dimension, so windows are
    /// ignored in that case.
    #[must_use]
    pub fn policy(&self) -> DimensionPolicy {
        if self.vehicles <= 1 {
            return DimensionPolicy::NoLimit;
        }
        if self.windows.is_empty() {
            DimensionPolicy::DistanceCap(self.max_distance)
        } else {
            DimensionPolicy::TimeWindows(
                TimeWindowPolicy::new(self.windows.clone(), self.speed)
                    .with_max_time(self.max_distance)
                    .with_max_wait(self.scale * self.scale),
            )
        }
    }

    /// Draw colours and, when needed, positions, then build the model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for a non-finite blend, mis-sized
    /// positions, or any error raised by [`RoutingModelBuilder::build`].
    pub fn build(&self) -> Result<Instance, ConfigurationError> {
        if !self.blend.is_finite() {
            return Err(ConfigurationError::NonFiniteBlend(self.blend));
        }
        let blend = DistanceBlend::new(self.blend);
        if !blend.is_interpolating() {
            log::warn!(
                "distance blend {} lies outside [0, 1]; costs are extrapolated",
                self.blend
            );
        }
        if self.vehicles == 1 && !self.windows.is_empty() {
            log::warn!("time windows are ignored for a single vehicle");
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let palette = Palette::random(self.vehicles, &mut rng);
        let positions = match &self.positions {
            Some(positions) if positions.len() != self.locations => {
                return Err(ConfigurationError::LengthMismatch {
                    what: "positions",
                    expected: self.locations,
                    actual: positions.len(),
                });
            }
            Some(positions) => positions.clone(),
            None => random_positions(self.locations, self.scale, &mut rng),
        };

        let distances = DistanceMatrix::from_positions(&positions, blend);
        let model = RoutingModelBuilder::new(positions, distances)
            .vehicles(self.vehicles)
            .demands(self.demands.clone())
            .capacities(self.capacities.clone())
            .policy(self.policy())
            .build()?;
        log::debug!(
            "built instance with {} locations, {} vehicles and {} dimensions",
            model.locations().len(),
            model.num_vehicles(),
            model.dimensions().len()
        );
        Ok(Instance { model, palette })
    }
}

/// Uniform positions in `[-scale/2, scale/2)²`, with the depot at the origin.
#[must_use]
pub fn random_positions<R: Rng>(locations: usize, scale: f64, rng: &mut R) -> Vec<Coord<f64>> {
    let half = scale / 2.0;
    (0..locations)
        .map(|id| {
            let x = rng.r#gen::<f64>() * scale - half;
            let y = rng.r#gen::<f64>() * scale - half;
            if id == DEPOT {
                Coord { x: 0.0, y: 0.0 }
            } else {
                Coord { x, y }
            }
        })
        .collect()
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect for readable failures"
)]
mod tests {
    use super::*;
    use crate::{CAPACITY, DISTANCE, TIME};
    use rstest::rstest;

    #[rstest]
    fn defaults_follow_construction_parameters() {
        let config = ProblemConfig::default();
        assert_eq!(config.vehicles, 1);
        assert!((config.max_distance - 2_147_483_648.0).abs() < f64::EPSILON);
        assert!((config.scale - 1000.0).abs() < f64::EPSILON);
        assert!((config.speed - 1000.0).abs() < f64::EPSILON);
        assert!(config.blend.abs() < f64::EPSILON);
    }

    #[rstest]
    fn random_positions_stay_in_square() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let positions = random_positions(50, 200.0, &mut rng);
        assert_eq!(positions.first(), Some(&Coord { x: 0.0, y: 0.0 }));
        assert!(
            positions
                .iter()
                .all(|p| (-100.0..100.0).contains(&p.x) && (-100.0..100.0).contains(&p.y))
        );
    }

    #[rstest]
    fn same_seed_gives_same_instance() {
        let config = ProblemConfig::new(8).with_vehicles(3).with_seed(42);
        let first = config.build().expect("valid config");
        let second = config.build().expect("valid config");
        assert_eq!(first, second);
        let other = config.clone().with_seed(43).build().expect("valid config");
        assert_ne!(first.model.distances(), other.model.distances());
    }

    #[rstest]
    fn single_vehicle_has_no_limit() {
        let instance = ProblemConfig::new(4)
            .with_windows(vec![TimeWindow::unconstrained(); 4])
            .build()
            .expect("valid config");
        assert_eq!(instance.model.policy(), &DimensionPolicy::NoLimit);
        assert!(instance.model.dimensions().is_empty());
    }

    #[rstest]
    fn fleet_without_windows_caps_distance() {
        let instance = ProblemConfig::new(4)
            .with_vehicles(2)
            .with_max_distance(500.0)
            .build()
            .expect("valid config");
        let distance = instance.model.dimension(DISTANCE).expect("distance dimension");
        assert_eq!(distance.capacity_for(1), Some(500.0));
    }

    #[rstest]
    fn fleet_with_windows_tracks_time() {
        let windows = vec![
            TimeWindow::unconstrained(),
            TimeWindow::new(1.0, 2.0),
            TimeWindow::unconstrained(),
        ];
        let instance = ProblemConfig::new(3)
            .with_vehicles(2)
            .with_scale(100.0)
            .with_windows(windows)
            .build()
            .expect("valid config");
        let time = instance.model.dimension(TIME).expect("time dimension");
        assert!(!time.start_fixed_at_zero());
        assert!((time.slack_max() - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(instance.model.finalizer_objectives().len(), 4);
    }

    #[rstest]
    fn capacities_are_forwarded() {
        let instance = ProblemConfig::new(3)
            .with_vehicles(2)
            .with_capacities(vec![5, 5], vec![0, 2, 3])
            .build()
            .expect("valid config");
        assert!(instance.model.dimension(CAPACITY).is_some());
    }

    #[rstest]
    fn explicit_positions_are_kept() {
        let positions = vec![Coord { x: 1.0, y: 1.0 }, Coord { x: 4.0, y: 5.0 }];
        let instance = ProblemConfig::new(2)
            .with_positions(positions.clone())
            .build()
            .expect("valid config");
        let kept: Vec<_> = instance
            .model
            .locations()
            .iter()
            .map(|location| location.position)
            .collect();
        assert_eq!(kept, positions);
        assert_eq!(instance.model.distances().get(0, 1), Some(5.0));
    }

    #[rstest]
    fn mis_sized_positions_are_rejected() {
        let err = ProblemConfig::new(3)
            .with_positions(vec![Coord { x: 0.0, y: 0.0 }])
            .build()
            .expect_err("length mismatch");
        assert_eq!(
            err,
            ConfigurationError::LengthMismatch {
                what: "positions",
                expected: 3,
                actual: 1,
            }
        );
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn non_finite_blend_is_rejected(#[case] blend: f64) {
        let err = ProblemConfig::new(3)
            .with_blend(blend)
            .build()
            .expect_err("non-finite blend");
        assert!(matches!(err, ConfigurationError::NonFiniteBlend(_)));
    }

    #[rstest]
    fn extrapolated_blend_is_accepted() {
        let instance = ProblemConfig::new(3)
            .with_blend(1.5)
            .build()
            .expect("extrapolated blend");
        assert_eq!(instance.model.distances().len(), 3);
    }
}
