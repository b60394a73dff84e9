//! Pairwise travel costs.
//!
//! [`DistanceMatrix`] materialises every `(from, to)` cost eagerly from a set
//! of planar positions. Costs blend the Manhattan and Euclidean metrics:
//! `cost = α · manhattan + (1 - α) · euclid`.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weighting between the Euclidean (`0.0`) and Manhattan (`1.0`) metrics.
///
/// Factors outside `[0, 1]` extrapolate the blend rather than being clamped.
///
/// # Examples
/// ```
/// use fleetroute_core::DistanceBlend;
///
/// assert_eq!(DistanceBlend::default(), DistanceBlend::EUCLIDEAN);
/// assert!(DistanceBlend::new(0.5).is_interpolating());
/// assert!(!DistanceBlend::new(1.5).is_interpolating());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceBlend(f64);

impl DistanceBlend {
    /// Pure straight-line distance.
    pub const EUCLIDEAN: Self = Self(0.0);
    /// Pure grid distance.
    pub const MANHATTAN: Self = Self(1.0);

    /// Wrap a raw blend factor.
    #[must_use]
    pub const fn new(factor: f64) -> Self {
        Self(factor)
    }

    /// The raw blend factor.
    #[must_use]
    pub const fn factor(self) -> f64 {
        self.0
    }

    /// Whether the factor lies in `[0, 1]`, yielding a convex combination.
    #[must_use]
    pub fn is_interpolating(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }

    /// Blended cost between two positions.
    #[must_use]
    pub fn cost(self, from: Coord<f64>, to: Coord<f64>) -> f64 {
        let delta = from - to;
        let manhattan = delta.x.abs() + delta.y.abs();
        let euclid = delta.x.hypot(delta.y);
        self.0 * manhattan + (1.0 - self.0) * euclid
    }
}

/// Square matrix of blended travel costs with a zero diagonal.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fleetroute_core::{DistanceBlend, DistanceMatrix};
///
/// let positions = [Coord { x: 0.0, y: 0.0 }, Coord { x: 3.0, y: 4.0 }];
/// let euclid = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
/// let manhattan = DistanceMatrix::from_positions(&positions, DistanceBlend::MANHATTAN);
/// assert_eq!(euclid.get(0, 1), Some(5.0));
/// assert_eq!(manhattan.get(1, 0), Some(7.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceMatrix {
    costs: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Compute all pairwise costs for `positions`.
    #[must_use]
    pub fn from_positions(positions: &[Coord<f64>], blend: DistanceBlend) -> Self {
        let costs = positions
            .iter()
            .map(|&from| {
                positions
                    .iter()
                    .map(|&to| blend.cost(from, to))
                    .collect()
            })
            .collect();
        Self { costs }
    }

    /// Wrap a pre-computed square matrix. Returns `None` when the rows are
    /// not all `n` long.
    #[must_use]
    pub fn from_rows(costs: Vec<Vec<f64>>) -> Option<Self> {
        let n = costs.len();
        costs
            .iter()
            .all(|row| row.len() == n)
            .then_some(Self { costs })
    }

    /// Number of locations covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.costs.len()
    }

    /// Whether the matrix covers no locations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Cost of travelling from `from` to `to`.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        self.costs.get(from).and_then(|row| row.get(to)).copied()
    }

    /// All costs departing `from`.
    #[must_use]
    pub fn row(&self, from: usize) -> Option<&[f64]> {
        self.costs.get(from).map(Vec::as_slice)
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.costs.iter().map(Vec::as_slice)
    }

    /// Total distance if every location were served by its own return trip
    /// from the depot: `2 · Σ d[0][j]`.
    #[must_use]
    pub fn round_trip_total(&self) -> f64 {
        self.row(crate::DEPOT)
            .map_or(0.0, |row| row.iter().sum::<f64>() * 2.0)
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

    fn square() -> Vec<Coord<f64>> {
        vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 10.0, y: 10.0 },
        ]
    }

    #[rstest]
    #[case(DistanceBlend::EUCLIDEAN, 200.0_f64.sqrt())]
    #[case(DistanceBlend::MANHATTAN, 20.0)]
    #[case(DistanceBlend::new(0.5), 10.0 + 50.0_f64.sqrt())]
    fn blend_mixes_metrics(#[case] blend: DistanceBlend, #[case] expected: f64) {
        let matrix = DistanceMatrix::from_positions(&square(), blend);
        let cost = matrix.get(0, 2).expect("cost exists");
        assert!((cost - expected).abs() < 1e-9);
    }

    #[rstest]
    fn extrapolated_blend_is_accepted() {
        let matrix = DistanceMatrix::from_positions(&square(), DistanceBlend::new(-1.0));
        // 2 · euclid - manhattan
        let cost = matrix.get(0, 2).expect("cost exists");
        assert!((cost - (2.0 * 200.0_f64.sqrt() - 20.0)).abs() < 1e-9);
    }

    #[rstest]
    fn round_trip_total_doubles_depot_row() {
        let matrix = DistanceMatrix::from_positions(&square(), DistanceBlend::MANHATTAN);
        assert!((matrix.round_trip_total() - 60.0).abs() < 1e-9);
    }

    #[rstest]
    fn from_rows_rejects_ragged_input() {
        assert!(DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).is_none());
        assert!(DistanceMatrix::from_rows(vec![vec![0.0]]).is_some());
    }

    #[rstest]
    fn out_of_range_lookup_is_none() {
        let matrix = DistanceMatrix::from_positions(&square(), DistanceBlend::EUCLIDEAN);
        assert_eq!(matrix.get(3, 0), None);
        assert!(matrix.row(5).is_none());
    }
}
