#![forbid(unsafe_code)]
//! rumor-sim library.
//!
//! Two-stage rumor spreading on a scale-free contact network. Before the
//! intervention step the rumor spreads and fades through susceptible,
//! spreader, and recovered nodes; at the intervention step officials and
//! opinion leaders are seeded as debunkers, and from then on their influence
//! ranges push nearby nodes toward debunking or recovery.
//!
//! ```no_run
//! use rumor_sim::{SimulationConfig, simulate};
//!
//! let output = simulate(SimulationConfig::default().with_seed(7))?;
//! println!("final spreader share: {:?}", output.series.final_fractions());
//! # Ok::<(), rumor_sim::SimError>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Library operations return [`SimError`]; the campaign layer
//!   uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//! - **Determinism**: Every random draw comes from a stream derived from
//!   the configured master seed.

pub mod campaign;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod node;
pub mod oracle;
pub mod rng;

pub use config::{MAX_SEED, SimulationConfig, TransitionRates};
pub use engine::{Exposure, InterventionReport, RunOutput, SimWarning, Simulation};
pub use error::SimError;
pub use metrics::{PopulationCounts, PopulationFractions, TimeSeries};
pub use node::{DebunkerKind, NodeId, NodeState};

/// Build a simulation from `config` and run it to completion.
///
/// # Errors
///
/// Returns [`SimError::InvalidParameter`] for a bad configuration and
/// propagates network errors.
pub fn simulate(config: SimulationConfig) -> Result<RunOutput, SimError> {
    Simulation::new(config)?.run()
}
