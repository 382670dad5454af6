//! Undirected contact network stored as sorted adjacency lists.
//!
//! # Invariants
//!
//! - Symmetric: `b ∈ neighbors(a)` iff `a ∈ neighbors(b)`.
//! - No self-loops and no parallel edges.
//! - Every neighbor list is sorted by ascending node id. Callers that scan
//!   for the "first" neighbor matching a predicate rely on this order.

use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::GraphError;

/// Node identifier: a dense index in `0..node_count`.
pub type NodeId = usize;

/// Undirected simple graph with sorted adjacency lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Graph {
    adjacency: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl Graph {
    /// Create a graph with `node_count` isolated nodes.
    #[must_use]
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    /// Build a graph from an explicit edge list.
    ///
    /// Duplicate edges (in either orientation) are collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfRange`] for an endpoint `>= node_count`
    /// and [`GraphError::SelfLoop`] for an edge `(a, a)`.
    pub fn from_edges(node_count: usize, edges: &[(NodeId, NodeId)]) -> Result<Self, GraphError> {
        let mut graph = Self::with_nodes(node_count);
        for &(a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Degree of `node`, or 0 if it does not exist.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(node).map_or(0, Vec::len)
    }

    /// Degrees of all nodes, indexed by node id.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    /// Neighbors of `node` in ascending id order (empty if it does not exist).
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// Whether the undirected edge `a — b` exists.
    #[must_use]
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Insert the undirected edge `a — b`.
    ///
    /// Returns `Ok(false)` when the edge already existed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfRange`] or [`GraphError::SelfLoop`].
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }

        let Err(pos_a) = self.adjacency[a].binary_search(&b) else {
            return Ok(false);
        };
        self.adjacency[a].insert(pos_a, b);
        if let Err(pos_b) = self.adjacency[b].binary_search(&a) {
            self.adjacency[b].insert(pos_b, a);
        }
        self.edge_count += 1;
        Ok(true)
    }

    /// Iterate all edges once as `(low, high)` pairs in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    /// Verify `node` exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfRange`] if it does not.
    pub fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if node < self.node_count() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange {
                node,
                node_count: self.node_count(),
            })
        }
    }

    /// Convert into a petgraph undirected graph whose node weights are the
    /// original node ids. Node indices are preserved.
    #[must_use]
    pub fn to_petgraph(&self) -> UnGraph<NodeId, ()> {
        let mut graph = UnGraph::with_capacity(self.node_count(), self.edge_count);
        for id in 0..self.node_count() {
            graph.add_node(id);
        }
        for (a, b) in self.edges() {
            graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        graph
    }
}
