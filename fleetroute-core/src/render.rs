//! Drawable view of a solved problem.
//!
//! [`RenderGraph`] carries everything an external drawing tool needs:
//! node positions, node sizes and weighted, coloured edges. Nothing is
//! drawn here.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Colour, DEPOT, ExtractError, Palette, Solution};

/// Marker size of the depot.
pub const DEPOT_NODE_SIZE: u32 = 15;
/// Marker size of every other location.
pub const CUSTOMER_NODE_SIZE: u32 = 5;

/// A travelled arc ready for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderEdge {
    /// Departure location.
    pub from: usize,
    /// Arrival location.
    pub to: usize,
    /// Arc cost.
    pub weight: f64,
    /// Vehicle colour.
    pub colour: Colour,
}

/// Positions, sizes and edges of a solution.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fleetroute_core::{
///     Assignment, DistanceBlend, DistanceMatrix, Palette, RenderGraph, RoutingModelBuilder,
///     Solution,
/// };
///
/// let positions = vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
///     Coord { x: 1.0, y: 1.0 },
/// ];
/// let distances = DistanceMatrix::from_positions(&positions, DistanceBlend::EUCLIDEAN);
/// let model = RoutingModelBuilder::new(positions, distances).build()?;
/// let assignment = Assignment::from_visits(&model, &[vec![1, 2]])?;
/// let solution = Solution::new(&model, assignment);
/// let graph = RenderGraph::from_solution(&solution, &Palette::default())?;
/// assert_eq!(graph.node_sizes, vec![15, 5, 5]);
/// assert_eq!(graph.edges.len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderGraph {
    /// Location positions, indexed by location id.
    pub positions: Vec<Coord<f64>>,
    /// Marker size per location.
    pub node_sizes: Vec<u32>,
    /// Route arcs in vehicle order.
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    /// Collect the drawable graph of `solution`, colouring each vehicle from
    /// `palette`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when a route cannot be extracted.
    pub fn from_solution(
        solution: &Solution<'_>,
        palette: &Palette,
    ) -> Result<Self, ExtractError> {
        let locations = solution.model().locations();
        let positions = locations.iter().map(|location| location.position).collect();
        let node_sizes = locations
            .iter()
            .map(|location| {
                if location.id == DEPOT {
                    DEPOT_NODE_SIZE
                } else {
                    CUSTOMER_NODE_SIZE
                }
            })
            .collect();
        let edges = solution
            .edges(palette)?
            .into_iter()
            .map(|edge| RenderEdge {
                from: edge.from,
                to: edge.to,
                weight: edge.cost,
                colour: edge.colour,
            })
            .collect();
        Ok(Self {
            positions,
            node_sizes,
            edges,
        })
    }

    /// Serialise the graph as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when serialisation fails.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect for readable failures"
)]
mod tests {
    use super::*;
    use crate::Assignment;
    use crate::test_support::line_model;
    use rstest::rstest;

    fn palette() -> Palette {
        Palette::new(vec![Colour {
            r: 0.2,
            g: 0.4,
            b: 0.6,
            a: 0.5,
        }])
    }

    #[rstest]
    fn graph_mirrors_input_positions() {
        let model = line_model(4, 2);
        let assignment = Assignment::from_visits(&model, &[vec![3], vec![1, 2]]).expect("visits");
        let graph =
            RenderGraph::from_solution(&Solution::new(&model, assignment), &palette()).expect("graph");
        let expected: Vec<Coord<f64>> = model
            .locations()
            .iter()
            .map(|location| location.position)
            .collect();
        assert_eq!(graph.positions, expected);
        assert_eq!(graph.node_sizes, vec![15, 5, 5, 5]);
        assert_eq!(
            graph
                .edges
                .iter()
                .map(|edge| (edge.from, edge.to))
                .collect::<Vec<_>>(),
            vec![(0, 3), (3, 0), (0, 1), (1, 2), (2, 0)]
        );
        assert!(graph.edges.iter().all(|edge| edge.colour == palette().colour(0)));
        let weight: f64 = graph.edges.iter().map(|edge| edge.weight).sum();
        assert!((weight - 100.0).abs() < 1e-9);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn graph_serialises_to_json() {
        let model = line_model(2, 1);
        let assignment = Assignment::from_visits(&model, &[vec![1]]).expect("visits");
        let graph =
            RenderGraph::from_solution(&Solution::new(&model, assignment), &palette()).expect("graph");
        let json = graph.to_json().expect("serialise");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["node_sizes"], serde_json::json!([15, 5]));
        assert_eq!(value["edges"][0]["to"], serde_json::json!(1));
        assert_eq!(value["positions"][1]["x"], serde_json::json!(10.0));
    }
}
