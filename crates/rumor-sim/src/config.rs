//! Simulation configuration.
//!
//! A [`SimulationConfig`] is plain numeric data: it can be built in code,
//! deserialized from TOML, or assembled by the CLI from a file plus flag
//! overrides. [`SimulationConfig::validate`] runs before anything else
//! touches the configuration, and rejects values instead of clamping them.
//!
//! ```toml
//! seed = 7
//! nodes = 2000
//! edges_per_node = 2
//! steps = 40
//! intervention_step = 8
//! official_ratio = 0.25
//! ```
//!
//! Missing keys take the values of [`SimulationConfig::default`]; unknown
//! keys are an error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Largest accepted master seed. TOML integers are signed 64-bit, so a larger
/// seed could not be written back to a configuration file.
pub const MAX_SEED: u64 = i64::MAX.unsigned_abs();

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master seed; topology and dynamics streams are derived from it.
    pub seed: u64,
    /// Network size `N`.
    pub nodes: usize,
    /// Edges formed by each node added during growth (`m`).
    pub edges_per_node: usize,
    /// Spreaders at `t = 0` (`I0`).
    pub initial_spreaders: usize,
    /// Number of steps `T`; the series hold `T + 1` samples.
    pub steps: usize,
    /// Step `Td` at which debunkers are seeded.
    pub intervention_step: usize,
    /// Debunkers seeded at `Td` (`D0`).
    pub initial_debunkers: usize,
    /// Share of `D0` that are officials; the rest are opinion leaders.
    pub official_ratio: f64,
    /// Hop radius of an official debunker's influence.
    pub official_layers: usize,
    /// Hop radius of an opinion leader's influence.
    pub opinion_layers: usize,
    /// Susceptible → Spreader probability.
    pub alpha_i: f64,
    /// Susceptible → Recovered probability.
    pub alpha_r: f64,
    /// Susceptible → Debunker probability.
    pub alpha_d: f64,
    /// Spreader → Debunker probability.
    pub beta_d: f64,
    /// Recovery probability for spreaders and converted debunkers.
    pub delta: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            nodes: 5000,
            edges_per_node: 2,
            initial_spreaders: 10,
            steps: 50,
            intervention_step: 10,
            initial_debunkers: 10,
            official_ratio: 0.1,
            official_layers: 3,
            opinion_layers: 2,
            alpha_i: 0.1,
            alpha_r: 0.8,
            alpha_d: 0.1,
            beta_d: 0.6,
            delta: 0.5,
        }
    }
}

/// Base transition probabilities, before any influence boost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionRates {
    /// Susceptible → Spreader.
    pub alpha_i: f64,
    /// Susceptible → Recovered.
    pub alpha_r: f64,
    /// Susceptible → Debunker.
    pub alpha_d: f64,
    /// Spreader → Debunker.
    pub beta_d: f64,
    /// Recovery.
    pub delta: f64,
}

impl SimulationConfig {
    /// Parse a TOML document. Missing keys take default values.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigParse`] on malformed TOML, wrong types, or
    /// unknown keys. The result is not validated.
    pub fn from_toml_str(text: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigRead`] if the file cannot be read and
    /// [`SimError::ConfigParse`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Same configuration with a different master seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Base transition probabilities.
    #[must_use]
    pub const fn rates(&self) -> TransitionRates {
        TransitionRates {
            alpha_i: self.alpha_i,
            alpha_r: self.alpha_r,
            alpha_d: self.alpha_d,
            beta_d: self.beta_d,
            delta: self.delta,
        }
    }

    /// Number of officials among the `D0` seeded debunkers:
    /// `round(D0 * official_ratio)` with ties to even.
    #[must_use]
    pub fn official_quota(&self) -> usize {
        let exact = self.initial_debunkers as f64 * self.official_ratio;
        (exact.round_ties_even() as usize).min(self.initial_debunkers)
    }

    /// Number of opinion leaders among the `D0` seeded debunkers.
    #[must_use]
    pub fn opinion_quota(&self) -> usize {
        self.initial_debunkers - self.official_quota()
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.seed > MAX_SEED {
            return Err(SimError::invalid(
                "seed",
                format!("must be <= {MAX_SEED}, got {}", self.seed),
            ));
        }
        if self.nodes == 0 {
            return Err(SimError::invalid("nodes", "must be > 0"));
        }
        if self.edges_per_node >= self.nodes {
            return Err(SimError::invalid(
                "edges_per_node",
                format!("must be < nodes ({} >= {})", self.edges_per_node, self.nodes),
            ));
        }
        if self.steps == 0 {
            return Err(SimError::invalid("steps", "must be > 0"));
        }
        if self.intervention_step == 0 || self.intervention_step > self.steps {
            return Err(SimError::invalid(
                "intervention_step",
                format!(
                    "must be in [1, steps={}], got {}",
                    self.steps, self.intervention_step
                ),
            ));
        }
        if self.initial_spreaders > self.nodes {
            return Err(SimError::invalid(
                "initial_spreaders",
                format!(
                    "cannot exceed nodes ({} > {})",
                    self.initial_spreaders, self.nodes
                ),
            ));
        }
        let max_debunkers = self.nodes - self.initial_spreaders;
        if self.initial_debunkers > max_debunkers {
            return Err(SimError::invalid(
                "initial_debunkers",
                format!(
                    "cannot exceed nodes - initial_spreaders ({} > {max_debunkers})",
                    self.initial_debunkers
                ),
            ));
        }

        check_unit_interval("official_ratio", self.official_ratio)?;
        check_unit_interval("alpha_i", self.alpha_i)?;
        check_unit_interval("alpha_r", self.alpha_r)?;
        check_unit_interval("alpha_d", self.alpha_d)?;
        check_unit_interval("beta_d", self.beta_d)?;
        check_unit_interval("delta", self.delta)?;
        Ok(())
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::invalid(
            name,
            format!("must be a probability in [0, 1], got {value}"),
        ))
    }
}
