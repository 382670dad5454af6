//! Preferential-attachment (scale-free) network growth.
//!
//! # Algorithm
//!
//! 1. Nodes `0..=m` form a complete graph.
//! 2. Every later node `i` picks `m` distinct earlier nodes, each draw
//!    proportional to the target's degree. Duplicate picks are rejected and
//!    redrawn until `i` has exactly `m` new edges.
//!
//! Degrees used while node `i` samples are the ones in effect before `i`
//! started connecting. Sampling draws a uniform slot from an endpoint list in
//! which every edge contributes both endpoints, so a node appears once per
//! unit of degree. Only the prefix of the list that existed before node `i`
//! is eligible, which freezes the distribution during `i`'s turn.

use std::time::Instant;

use rand::Rng;
use tracing::{info, instrument};

use crate::error::GraphError;
use crate::network::{Graph, NodeId};

/// Emit a progress event every this many added nodes.
pub const PROGRESS_INTERVAL: usize = 500;

/// Grow a scale-free network of `nodes` nodes where each added node forms
/// `edges_per_node` edges.
///
/// Randomness comes only from `rng`; pass a dedicated topology stream so the
/// draws never overlap with the simulation dynamics.
///
/// # Errors
///
/// Returns [`GraphError::InvalidParameter`] if `nodes == 0` or
/// `edges_per_node >= nodes`.
#[instrument(skip(rng))]
pub fn generate<R: Rng + ?Sized>(
    nodes: usize,
    edges_per_node: usize,
    rng: &mut R,
) -> Result<Graph, GraphError> {
    if nodes == 0 {
        return Err(GraphError::invalid("nodes", "must be > 0"));
    }
    if edges_per_node >= nodes {
        return Err(GraphError::invalid(
            "edges_per_node",
            format!("must be < nodes ({edges_per_node} >= {nodes})"),
        ));
    }

    info!(nodes, edges_per_node, "generating scale-free network");
    let started = Instant::now();

    let seed_size = edges_per_node + 1;
    let expected_edges =
        seed_size * edges_per_node / 2 + (nodes - seed_size) * edges_per_node;

    let mut graph = Graph::with_nodes(nodes);
    let mut endpoints: Vec<NodeId> = Vec::with_capacity(expected_edges * 2);

    for a in 0..seed_size {
        for b in (a + 1)..seed_size {
            connect(&mut graph, &mut endpoints, a, b)?;
        }
    }

    let mut targets: Vec<NodeId> = Vec::with_capacity(edges_per_node);
    for node in seed_size..nodes {
        if node % PROGRESS_INTERVAL == 0 {
            let percent = (node as f64 / nodes as f64 * 1000.0).round() / 10.0;
            info!(node, nodes, percent, "network generation progress");
        }

        let pool = endpoints.len();
        targets.clear();
        while targets.len() < edges_per_node {
            let candidate = endpoints[sample_slot(rng, pool)];
            if !targets.contains(&candidate) {
                targets.push(candidate);
            }
        }

        for &target in &targets {
            connect(&mut graph, &mut endpoints, node, target)?;
        }
    }

    info!(
        nodes,
        edges = graph.edge_count(),
        elapsed_ms = started.elapsed().as_millis(),
        "scale-free network generated"
    );
    Ok(graph)
}

fn connect(
    graph: &mut Graph,
    endpoints: &mut Vec<NodeId>,
    a: NodeId,
    b: NodeId,
) -> Result<(), GraphError> {
    if graph.add_edge(a, b)? {
        endpoints.push(a);
        endpoints.push(b);
    }
    Ok(())
}

/// Uniform slot in `0..len`. `len` must be non-zero.
///
/// `gen_range` over `usize` samples a `u32` on 32-bit targets, so the draw is
/// made over `u64` to keep every target on the same stream. The result is
/// below `len`, so narrowing it back cannot truncate.
fn sample_slot<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    rng.gen_range(0..len as u64) as usize
}
