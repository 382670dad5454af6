#![forbid(unsafe_code)]
//! rumor-graph library.
//!
//! Contact networks for the rumor simulator: preferential-attachment
//! generation, bounded-hop influence ranges, and summary statistics.
//!
//! # Conventions
//!
//! - **Errors**: Return [`GraphError`] from fallible operations.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//! - **Ordering**: Neighbor lists are always sorted by ascending node id, so
//!   any scan over them is deterministic.

pub mod error;
pub mod generate;
pub mod influence;
pub mod network;
pub mod stats;

pub use error::GraphError;
pub use fixedbitset::FixedBitSet;
pub use generate::generate;
pub use influence::{influence_range, influence_union};
pub use network::{Graph, NodeId};
pub use stats::GraphStats;
