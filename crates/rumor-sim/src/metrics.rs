//! Per-step population fractions.
//!
//! The recorder is a pure reader of the committed state vector: it tallies
//! compartments and appends one sample per step, starting with the initial
//! condition at `t = 0`.

use serde::{Deserialize, Serialize};

use crate::node::NodeState;

/// Absolute compartment sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopulationCounts {
    /// Nodes in `S`.
    pub susceptible: usize,
    /// Nodes in `I`.
    pub spreader: usize,
    /// Nodes in `D`.
    pub debunker: usize,
    /// Nodes in `R`.
    pub recovered: usize,
}

impl PopulationCounts {
    /// Count each compartment in `states`.
    #[must_use]
    pub fn tally(states: &[NodeState]) -> Self {
        let mut counts = Self::default();
        for state in states {
            match state {
                NodeState::Susceptible => counts.susceptible += 1,
                NodeState::Spreader => counts.spreader += 1,
                NodeState::Debunker => counts.debunker += 1,
                NodeState::Recovered => counts.recovered += 1,
            }
        }
        counts
    }

    /// Total population.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.susceptible + self.spreader + self.debunker + self.recovered
    }

    /// Convert to fractions of the total population.
    #[must_use]
    pub fn fractions(&self) -> PopulationFractions {
        let total = self.total();
        if total == 0 {
            return PopulationFractions::default();
        }
        let n = total as f64;
        PopulationFractions {
            susceptible: self.susceptible as f64 / n,
            spreader: self.spreader as f64 / n,
            debunker: self.debunker as f64 / n,
            recovered: self.recovered as f64 / n,
        }
    }
}

/// Compartment sizes as fractions of `N`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PopulationFractions {
    /// Share in `S`.
    pub susceptible: f64,
    /// Share in `I`.
    pub spreader: f64,
    /// Share in `D`.
    pub debunker: f64,
    /// Share in `R`.
    pub recovered: f64,
}

impl PopulationFractions {
    /// Sum of all four shares; 1.0 up to rounding for a non-empty population.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.susceptible + self.spreader + self.debunker + self.recovered
    }
}

/// Four aligned time series, one sample per step including `t = 0`.
///
/// Serialized with the `S_frac` / `I_frac` / `D_frac` / `R_frac` keys that
/// plotting tools consume.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Susceptible share per step.
    #[serde(rename = "S_frac")]
    pub susceptible: Vec<f64>,
    /// Spreader share per step.
    #[serde(rename = "I_frac")]
    pub spreader: Vec<f64>,
    /// Debunker share per step.
    #[serde(rename = "D_frac")]
    pub debunker: Vec<f64>,
    /// Recovered share per step.
    #[serde(rename = "R_frac")]
    pub recovered: Vec<f64>,
}

impl TimeSeries {
    /// Empty series with room for `steps + 1` samples.
    #[must_use]
    pub fn with_steps(steps: usize) -> Self {
        Self {
            susceptible: Vec::with_capacity(steps + 1),
            spreader: Vec::with_capacity(steps + 1),
            debunker: Vec::with_capacity(steps + 1),
            recovered: Vec::with_capacity(steps + 1),
        }
    }

    /// Tally `states` and append the fractions as the sample for step
    /// `self.len()`.
    pub fn record(&mut self, states: &[NodeState]) -> PopulationFractions {
        let fractions = PopulationCounts::tally(states).fractions();
        self.susceptible.push(fractions.susceptible);
        self.spreader.push(fractions.spreader);
        self.debunker.push(fractions.debunker);
        self.recovered.push(fractions.recovered);
        fractions
    }

    /// Number of recorded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.susceptible.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.susceptible.is_empty()
    }

    /// Sample at step `t`.
    #[must_use]
    pub fn at(&self, t: usize) -> Option<PopulationFractions> {
        Some(PopulationFractions {
            susceptible: *self.susceptible.get(t)?,
            spreader: *self.spreader.get(t)?,
            debunker: *self.debunker.get(t)?,
            recovered: *self.recovered.get(t)?,
        })
    }

    /// Last recorded sample.
    #[must_use]
    pub fn final_fractions(&self) -> Option<PopulationFractions> {
        self.len().checked_sub(1).and_then(|t| self.at(t))
    }

    /// Largest spreader share and the first step it occurred at.
    #[must_use]
    pub fn peak_spreader(&self) -> Option<(usize, f64)> {
        self.spreader
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (t, value)| match best {
                Some((_, peak)) if peak >= value => best,
                _ => Some((t, value)),
            })
    }
}
