//! Summary statistics for a contact network.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the network.
//! - **min_degree** / **max_degree** / **mean_degree**: degree extremes and
//!   average. A scale-free network shows a max degree far above the mean.
//! - **hub**: lowest-id node holding the max degree (`None` for an empty
//!   graph).
//! - **density**: `edge_count / (n * (n - 1) / 2)`, 0.0 for fewer than two
//!   nodes.
//! - **component_count**: number of connected components.
//! - **isolated_node_count**: nodes with degree 0.

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::network::{Graph, NodeId};

/// Summary statistics for a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of undirected edges.
    pub edge_count: usize,
    /// Smallest node degree (0 for an empty graph).
    pub min_degree: usize,
    /// Largest node degree (0 for an empty graph).
    pub max_degree: usize,
    /// Average node degree, `2 * edges / nodes`.
    pub mean_degree: f64,
    /// Lowest-id node with the largest degree.
    pub hub: Option<NodeId>,
    /// Fraction of possible undirected edges present.
    pub density: f64,
    /// Number of connected components.
    pub component_count: usize,
    /// Number of nodes with no edges.
    pub isolated_node_count: usize,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();
        let degrees = graph.degrees();

        let min_degree = degrees.iter().copied().min().unwrap_or(0);
        let max_degree = degrees.iter().copied().max().unwrap_or(0);
        let hub = degrees.iter().position(|&d| d == max_degree);
        let isolated_node_count = degrees.iter().filter(|&&d| d == 0).count();

        let mean_degree = if node_count == 0 {
            0.0
        } else {
            2.0 * edge_count as f64 / node_count as f64
        };

        Self {
            node_count,
            edge_count,
            min_degree,
            max_degree,
            mean_degree,
            hub,
            density: compute_density(node_count, edge_count),
            component_count: connected_components(&graph.to_petgraph()),
            isolated_node_count,
        }
    }
}

fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let possible = node_count as f64 * (node_count as f64 - 1.0) / 2.0;
    edge_count as f64 / possible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let stats = GraphStats::from_graph(&Graph::with_nodes(0));
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.hub, None);
        assert_eq!(stats.component_count, 0);
        assert!(stats.density.abs() < f64::EPSILON);
    }

    #[test]
    fn star_with_island() {
        // 0 is the hub of a 4-leaf star, 5 is isolated.
        let g = Graph::from_edges(6, &[(0, 1), (0, 2), (0, 3), (0, 4)]).expect("valid");
        let stats = GraphStats::from_graph(&g);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.max_degree, 4);
        assert_eq!(stats.min_degree, 0);
        assert_eq!(stats.hub, Some(0));
        assert_eq!(stats.component_count, 2);
        assert_eq!(stats.isolated_node_count, 1);
        assert!((stats.mean_degree - 8.0 / 6.0).abs() < 1e-12);
        assert!((stats.density - 4.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn complete_graph_has_density_one() {
        let edges: Vec<_> = (0..5)
            .flat_map(|a| ((a + 1)..5).map(move |b| (a, b)))
            .collect();
        let g = Graph::from_edges(5, &edges).expect("valid");
        let stats = GraphStats::from_graph(&g);
        assert!((stats.density - 1.0).abs() < 1e-12);
        assert_eq!(stats.component_count, 1);
    }
}
