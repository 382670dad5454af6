//! Campaign runner for seed sweeps.
//!
//! Runs the same configuration under many master seeds, checks every run
//! with the oracle, and identifies the first failing seed for replay.

use std::ops::Range;
use std::time::Instant;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{MAX_SEED, SimulationConfig};
use crate::engine::{RunOutput, Simulation};
use crate::oracle::{InvariantViolation, OracleResult, check_run, format_violation};

/// Campaign-level configuration: which seeds to run and the parameters
/// shared by every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Range of master seeds to execute, e.g., `0..100`.
    pub seed_range: Range<u64>,
    /// Parameters for every run; its `seed` field is replaced per run.
    pub base: SimulationConfig,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            seed_range: 0..20,
            base: SimulationConfig {
                nodes: 500,
                ..SimulationConfig::default()
            },
        }
    }
}

impl CampaignConfig {
    /// Build a [`SimulationConfig`] for a specific seed.
    #[must_use]
    pub fn sim_config_for_seed(&self, seed: u64) -> SimulationConfig {
        self.base.clone().with_seed(seed)
    }

    /// Validate configuration before running.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed range is empty or the base parameters
    /// are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.seed_range.is_empty() {
            bail!("seed_range must not be empty");
        }
        if self.seed_range.end - 1 > MAX_SEED {
            bail!(
                "seed_range must end at or below {MAX_SEED}, got {}",
                self.seed_range.end - 1
            );
        }
        self.base.validate()?;
        Ok(())
    }
}

/// Failure details for a single seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFailure {
    /// The seed that failed.
    pub seed: u64,
    /// Invariant violations found.
    pub violations: Vec<String>,
}

/// Aggregate report produced by a campaign run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignReport {
    /// Total seeds executed.
    pub seeds_run: usize,
    /// Seeds that passed all invariants.
    pub seeds_passed: usize,
    /// First seed that failed (for prioritized replay).
    pub first_failure: Option<u64>,
    /// All seed failures with violation details.
    pub failures: Vec<SeedFailure>,
    /// Seeds whose intervention was under-seeded.
    pub seeds_with_warnings: usize,
}

impl CampaignReport {
    /// True if every seed passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Output and oracle verdict from replaying a single seed.
#[derive(Debug, Clone)]
pub struct SeedReplay {
    /// The complete run output.
    pub output: RunOutput,
    /// Oracle check result with violation details.
    pub oracle: OracleResult,
    /// [`RunOutput::fingerprint`] of the run.
    pub fingerprint: u64,
}

/// Run a full campaign across all seeds in the config.
///
/// # Errors
///
/// Returns an error if config validation fails or a simulation encounters
/// an internal error.
pub fn run_campaign(config: &CampaignConfig) -> Result<CampaignReport> {
    config.validate()?;
    let started = Instant::now();
    info!(
        seeds = ?config.seed_range,
        nodes = config.base.nodes,
        steps = config.base.steps,
        "campaign started"
    );

    let mut seeds_run = 0_usize;
    let mut seeds_passed = 0_usize;
    let mut first_failure: Option<u64> = None;
    let mut failures = Vec::new();
    let mut seeds_with_warnings = 0_usize;

    for seed in config.seed_range.clone() {
        seeds_run += 1;
        let (output, oracle) = evaluate_seed(seed, config)?;

        if !output.warnings.is_empty() {
            seeds_with_warnings += 1;
        }

        if oracle.passed {
            seeds_passed += 1;
        } else {
            warn!(seed, violations = oracle.violations.len(), "seed failed");
            if first_failure.is_none() {
                first_failure = Some(seed);
            }
            failures.push(SeedFailure {
                seed,
                violations: oracle.violations.iter().map(format_violation).collect(),
            });
        }
    }

    info!(
        seeds_run,
        seeds_passed,
        elapsed_ms = started.elapsed().as_millis(),
        "campaign complete"
    );

    Ok(CampaignReport {
        seeds_run,
        seeds_passed,
        first_failure,
        failures,
        seeds_with_warnings,
    })
}

/// Run a single seed and return Ok(()) on pass, Err(violations) on failure.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the simulation itself fails (invalid
/// config, etc). The inner `Result` distinguishes pass from invariant
/// violations.
pub fn run_single_seed(
    seed: u64,
    config: &CampaignConfig,
) -> Result<std::result::Result<(), Vec<InvariantViolation>>> {
    let (_, oracle) = evaluate_seed(seed, config)?;
    if oracle.passed {
        Ok(Ok(()))
    } else {
        Ok(Err(oracle.violations))
    }
}

/// Replay a single seed with full output for debugging.
///
/// # Errors
///
/// Returns an error when config validation or simulation fails.
pub fn replay_seed(seed: u64, config: &CampaignConfig) -> Result<SeedReplay> {
    config.base.validate()?;
    let (output, oracle) = evaluate_seed(seed, config)?;
    let fingerprint = output.fingerprint();
    Ok(SeedReplay {
        output,
        oracle,
        fingerprint,
    })
}

fn evaluate_seed(seed: u64, config: &CampaignConfig) -> Result<(RunOutput, OracleResult)> {
    let output = Simulation::new(config.sim_config_for_seed(seed))?.run()?;
    let oracle = check_run(&output);
    Ok((output, oracle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> CampaignConfig {
        CampaignConfig {
            seed_range: 0..8,
            base: SimulationConfig {
                nodes: 200,
                steps: 15,
                intervention_step: 5,
                ..SimulationConfig::default()
            },
        }
    }

    #[test]
    fn campaign_config_default_is_valid() {
        assert!(CampaignConfig::default().validate().is_ok());
    }

    #[test]
    fn campaign_config_empty_seed_range_rejected() {
        let config = CampaignConfig {
            seed_range: 5..5,
            ..CampaignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn campaign_seed_range_must_fit_config_files() {
        let mut config = small();
        config.seed_range = MAX_SEED - 2..MAX_SEED + 1;
        assert!(config.validate().is_ok());
        config.seed_range = MAX_SEED..MAX_SEED + 2;
        let err = config.validate().expect_err("seed past the TOML range");
        assert!(err.to_string().contains("seed_range"));
    }

    #[test]
    fn campaign_config_invalid_base_rejected() {
        let mut config = CampaignConfig::default();
        config.base.delta = 1.5;
        let err = config.validate().expect_err("invalid delta");
        assert!(err.to_string().contains("delta"));
    }

    #[test]
    fn sim_config_for_seed_uses_correct_seed() {
        let config = small();
        let sim = config.sim_config_for_seed(42);
        assert_eq!(sim.seed, 42);
        assert_eq!(sim.nodes, config.base.nodes);
        assert_eq!(sim.steps, config.base.steps);
    }

    #[test]
    fn run_single_seed_passes() {
        let result = run_single_seed(0, &small()).expect("sim should not error");
        assert!(result.is_ok(), "seed 0 should pass: {result:?}");
    }

    #[test]
    fn run_campaign_all_seeds_pass() {
        let report = run_campaign(&small()).expect("campaign should not error");
        assert_eq!(report.seeds_run, 8);
        assert_eq!(report.seeds_passed, 8);
        assert!(report.all_passed());
        assert!(report.first_failure.is_none());
    }

    #[test]
    fn campaign_counts_under_seeded_runs() {
        // alpha_r + alpha_i = 1, so every susceptible node next to a spreader
        // leaves S; fewer than 25 of the 30 nodes are left to seed at step 5.
        let config = CampaignConfig {
            seed_range: 0..5,
            base: SimulationConfig {
                nodes: 30,
                initial_spreaders: 5,
                steps: 8,
                intervention_step: 5,
                initial_debunkers: 25,
                alpha_i: 0.2,
                alpha_r: 0.8,
                ..SimulationConfig::default()
            },
        };
        let report = run_campaign(&config).expect("campaign");
        assert!(report.all_passed(), "failures: {:?}", report.failures);
        assert!(report.seeds_with_warnings > 0);
    }

    #[test]
    fn replay_is_deterministic() {
        let config = small();
        let a = replay_seed(7, &config).expect("replay 1");
        let b = replay_seed(7, &config).expect("replay 2");
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.output.final_states, b.output.final_states);
        assert!(a.oracle.passed, "oracle should pass: {:?}", a.oracle.violations);
    }

    #[test]
    fn campaign_report_serializes_to_json() {
        let report = CampaignReport {
            seeds_run: 10,
            seeds_passed: 9,
            first_failure: Some(7),
            failures: vec![SeedFailure {
                seed: 7,
                violations: vec!["FractionSum: step 3 fractions sum to 0.9".into()],
            }],
            seeds_with_warnings: 0,
        };
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"seeds_run\":10"));
        assert!(json.contains("\"first_failure\":7"));
        assert!(!json.contains("mean"), "unexpected cross-seed field: {json}");
    }
}
