//! Command handlers.
//!
//! Each subcommand lives in its own module and exposes an `Args` struct plus
//! a `run_*` entry point taking the resolved [`crate::output::OutputMode`].

pub mod check;
pub mod config;
pub mod graph;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use rumor_sim::SimulationConfig;

/// Per-parameter overrides layered on top of the defaults or a config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamOverrides {
    /// Network size N.
    #[arg(long, help_heading = "Parameters")]
    pub nodes: Option<usize>,

    /// Edges each new node forms during growth (m).
    #[arg(short = 'm', long, help_heading = "Parameters")]
    pub edges_per_node: Option<usize>,

    /// Spreaders at t=0 (I0).
    #[arg(long, help_heading = "Parameters")]
    pub initial_spreaders: Option<usize>,

    /// Number of steps T.
    #[arg(long, help_heading = "Parameters")]
    pub steps: Option<usize>,

    /// Step Td at which debunkers are seeded.
    #[arg(long, help_heading = "Parameters")]
    pub intervention_step: Option<usize>,

    /// Debunkers seeded at Td (D0).
    #[arg(long, help_heading = "Parameters")]
    pub initial_debunkers: Option<usize>,

    /// Share of D0 seeded as officials.
    #[arg(long, help_heading = "Parameters")]
    pub official_ratio: Option<f64>,

    /// Hop radius of official influence.
    #[arg(long, help_heading = "Parameters")]
    pub official_layers: Option<usize>,

    /// Hop radius of opinion-leader influence.
    #[arg(long, help_heading = "Parameters")]
    pub opinion_layers: Option<usize>,

    /// Susceptible to spreader probability.
    #[arg(long, help_heading = "Rates")]
    pub alpha_i: Option<f64>,

    /// Susceptible to recovered probability.
    #[arg(long, help_heading = "Rates")]
    pub alpha_r: Option<f64>,

    /// Susceptible to debunker probability.
    #[arg(long, help_heading = "Rates")]
    pub alpha_d: Option<f64>,

    /// Spreader to debunker probability.
    #[arg(long, help_heading = "Rates")]
    pub beta_d: Option<f64>,

    /// Recovery probability.
    #[arg(long, help_heading = "Rates")]
    pub delta: Option<f64>,
}

impl ParamOverrides {
    /// Overwrite every field of `config` that was given on the command line.
    pub fn apply(&self, config: &mut SimulationConfig) {
        fn set<T: Copy>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut config.nodes, self.nodes);
        set(&mut config.edges_per_node, self.edges_per_node);
        set(&mut config.initial_spreaders, self.initial_spreaders);
        set(&mut config.steps, self.steps);
        set(&mut config.intervention_step, self.intervention_step);
        set(&mut config.initial_debunkers, self.initial_debunkers);
        set(&mut config.official_ratio, self.official_ratio);
        set(&mut config.official_layers, self.official_layers);
        set(&mut config.opinion_layers, self.opinion_layers);
        set(&mut config.alpha_i, self.alpha_i);
        set(&mut config.alpha_r, self.alpha_r);
        set(&mut config.alpha_d, self.alpha_d);
        set(&mut config.beta_d, self.beta_d);
        set(&mut config.delta, self.delta);
    }
}

/// Build the effective configuration: defaults, then `path` if given, then
/// command-line overrides and `seed`. The result is validated.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ParamOverrides,
    seed: Option<u64>,
) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    overrides.apply(&mut config);
    if let Some(seed) = seed {
        config.seed = seed;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}
