//! Bounded-hop influence ranges.
//!
//! A node is within the influence range of a source at depth `d` when it can
//! be reached from the source in at most `d` hops. The source itself is always
//! in range, so depth 0 yields just the source.
//!
//! The simulator asks "is node x within depth d of ANY debunker of kind k"
//! for every node, every step. [`influence_union`] answers that for all nodes
//! at once with a single multi-source BFS, which yields exactly the union of
//! the per-source ranges that [`influence_range`] computes.

use std::collections::BTreeSet;

use fixedbitset::FixedBitSet;

use crate::error::GraphError;
use crate::network::{Graph, NodeId};

/// All nodes within `depth` hops of `source`, including `source`.
///
/// # Errors
///
/// Returns [`GraphError::NodeOutOfRange`] if `source` is not in the graph.
pub fn influence_range(
    graph: &Graph,
    source: NodeId,
    depth: usize,
) -> Result<BTreeSet<NodeId>, GraphError> {
    let reached = influence_union(graph, [source], depth)?;
    Ok(reached.ones().collect())
}

/// Membership mask of every node within `depth` hops of at least one source.
///
/// An empty source set yields an empty mask. Duplicate sources are harmless.
///
/// # Errors
///
/// Returns [`GraphError::NodeOutOfRange`] if any source is not in the graph.
pub fn influence_union(
    graph: &Graph,
    sources: impl IntoIterator<Item = NodeId>,
    depth: usize,
) -> Result<FixedBitSet, GraphError> {
    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut frontier: Vec<NodeId> = Vec::new();

    for source in sources {
        graph.check_node(source)?;
        if !visited.put(source) {
            frontier.push(source);
        }
    }

    let mut next: Vec<NodeId> = Vec::new();
    for _ in 0..depth {
        if frontier.is_empty() {
            break;
        }
        for &node in &frontier {
            for &neighbor in graph.neighbors(node) {
                if !visited.put(neighbor) {
                    next.push(neighbor);
                }
            }
        }
        frontier.clear();
        std::mem::swap(&mut frontier, &mut next);
    }

    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 - 1 - 2 - 3 - 4, plus an isolated node 5.
    fn path_with_island() -> Graph {
        Graph::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4)]).expect("valid")
    }

    #[test]
    fn depth_zero_is_source_only() {
        let g = path_with_island();
        let range = influence_range(&g, 2, 0).expect("valid");
        assert_eq!(range, BTreeSet::from([2]));
    }

    #[test]
    fn depth_counts_hops() {
        let g = path_with_island();
        assert_eq!(
            influence_range(&g, 0, 2).expect("valid"),
            BTreeSet::from([0, 1, 2])
        );
        assert_eq!(
            influence_range(&g, 2, 1).expect("valid"),
            BTreeSet::from([1, 2, 3])
        );
    }

    #[test]
    fn depth_beyond_diameter_covers_component_only() {
        let g = path_with_island();
        let range = influence_range(&g, 4, 100).expect("valid");
        assert_eq!(range, BTreeSet::from([0, 1, 2, 3, 4]));
        assert!(!range.contains(&5));
    }

    #[test]
    fn isolated_source_reaches_itself() {
        let g = path_with_island();
        assert_eq!(
            influence_range(&g, 5, 3).expect("valid"),
            BTreeSet::from([5])
        );
    }

    #[test]
    fn unknown_source_rejected() {
        let g = path_with_island();
        assert!(matches!(
            influence_range(&g, 6, 1),
            Err(GraphError::NodeOutOfRange { node: 6, .. })
        ));
        assert!(influence_union(&g, [0, 9], 1).is_err());
    }

    #[test]
    fn union_matches_per_source_ranges() {
        let g = path_with_island();
        let mask = influence_union(&g, [0, 4], 1).expect("valid");
        let mut expected = influence_range(&g, 0, 1).expect("valid");
        expected.extend(influence_range(&g, 4, 1).expect("valid"));
        let actual: BTreeSet<_> = mask.ones().collect();
        assert_eq!(actual, expected);
        assert!(!mask.contains(2));
    }

    #[test]
    fn empty_sources_give_empty_mask() {
        let g = path_with_island();
        let mask = influence_union(&g, std::iter::empty(), 3).expect("valid");
        assert_eq!(mask.count_ones(..), 0);
        assert_eq!(mask.len(), 6);
    }

    #[test]
    fn duplicate_sources_are_harmless() {
        let g = path_with_island();
        let mask = influence_union(&g, [1, 1, 1], 1).expect("valid");
        assert_eq!(mask.ones().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
