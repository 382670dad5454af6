//! `rumor check` — run the oracle over a seed range.
//!
//! `rumor replay` — rerun one seed with full oracle details.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use rumor_sim::campaign::{CampaignConfig, replay_seed, run_campaign};
use rumor_sim::oracle::format_violation;

use crate::cmd::{ParamOverrides, resolve_config};
use crate::output::{OutputMode, percent, pretty_kv, pretty_section};

/// Arguments for `rumor check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Number of seeds to run.
    #[arg(long, default_value = "20")]
    pub seeds: u64,

    /// Starting seed value.
    #[arg(long, default_value = "0")]
    pub seed_start: u64,

    /// TOML configuration file; flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub params: ParamOverrides,
}

/// Arguments for `rumor replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Seed to replay.
    #[arg(long)]
    pub seed: u64,

    /// TOML configuration file; flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub params: ParamOverrides,
}

/// JSON output for `rumor check`.
#[derive(Debug, Serialize)]
struct CheckOutput {
    seeds_run: usize,
    seeds_passed: usize,
    seeds_failed: usize,
    first_failure: Option<u64>,
    seeds_with_warnings: usize,
    all_passed: bool,
    failures: Vec<FailureOutput>,
}

#[derive(Debug, Serialize)]
struct FailureOutput {
    seed: u64,
    violations: Vec<String>,
}

/// JSON output for `rumor replay`.
#[derive(Debug, Serialize)]
struct ReplayOutput {
    seed: u64,
    steps: usize,
    oracle_passed: bool,
    violations: Vec<String>,
    warnings: Vec<String>,
    intervention: Option<rumor_sim::InterventionReport>,
    final_fractions: Option<rumor_sim::PopulationFractions>,
    fingerprint: String,
}

/// Execute `rumor check`.
pub fn run_check(args: &CheckArgs, output: OutputMode) -> Result<()> {
    let base = resolve_config(args.config.as_deref(), &args.params, None)?;
    let config = CampaignConfig {
        seed_range: args.seed_start..args.seed_start.saturating_add(args.seeds),
        base,
    };

    let report = run_campaign(&config)?;

    let out = CheckOutput {
        seeds_run: report.seeds_run,
        seeds_passed: report.seeds_passed,
        seeds_failed: report.failures.len(),
        first_failure: report.first_failure,
        seeds_with_warnings: report.seeds_with_warnings,
        all_passed: report.all_passed(),
        failures: report
            .failures
            .iter()
            .map(|f| FailureOutput {
                seed: f.seed,
                violations: f.violations.clone(),
            })
            .collect(),
    };

    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Text => {
            println!(
                "campaign seeds_run={} nodes={} steps={} intervention_step={}",
                out.seeds_run, config.base.nodes, config.base.steps, config.base.intervention_step
            );
            println!(
                "results passed={} failed={} warned={} all_passed={}",
                out.seeds_passed, out.seeds_failed, out.seeds_with_warnings, out.all_passed
            );
            if !out.all_passed {
                for failure in out.failures.iter().take(5) {
                    println!(
                        "failure seed={} violations={}",
                        failure.seed,
                        failure.violations.len()
                    );
                }
                if out.failures.len() > 5 {
                    println!("failures_truncated count={}", out.failures.len() - 5);
                }
                println!("hint replay_seed={}", out.first_failure.unwrap_or(0));
            }
        }
        OutputMode::Pretty => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            pretty_section(&mut w, "Seed Campaign")?;
            pretty_kv(&mut w, "Seeds", out.seeds_run.to_string())?;
            pretty_kv(&mut w, "Nodes", config.base.nodes.to_string())?;
            pretty_kv(&mut w, "Steps", config.base.steps.to_string())?;
            pretty_kv(
                &mut w,
                "Results",
                format!(
                    "{} passed / {} failed ({} under-seeded)",
                    out.seeds_passed, out.seeds_failed, out.seeds_with_warnings
                ),
            )?;

            if out.all_passed {
                pretty_kv(&mut w, "Status", "all seeds passed")?;
            } else {
                pretty_kv(
                    &mut w,
                    "Status",
                    format!(
                        "{} failures (first at seed {})",
                        out.seeds_failed,
                        out.first_failure.unwrap_or(0)
                    ),
                )?;
                println!();
                pretty_section(&mut w, "Failure Samples")?;
                for failure in out.failures.iter().take(5) {
                    println!(
                        "seed {:<8} violations={}",
                        failure.seed,
                        failure.violations.len()
                    );
                    for violation in &failure.violations {
                        println!("  - {violation}");
                    }
                }
                if out.failures.len() > 5 {
                    println!("... and {} more failures", out.failures.len() - 5);
                }
                println!();
                pretty_kv(
                    &mut w,
                    "Replay",
                    format!("rumor replay --seed {}", out.first_failure.unwrap_or(0)),
                )?;
            }
        }
    }

    // Exit code 1 on any failure for CI integration
    if !report.all_passed() {
        process::exit(1);
    }

    Ok(())
}

/// Execute `rumor replay`.
pub fn run_replay(args: &ReplayArgs, output: OutputMode) -> Result<()> {
    let base = resolve_config(args.config.as_deref(), &args.params, None)?;
    let config = CampaignConfig {
        seed_range: args.seed..args.seed.saturating_add(1),
        base,
    };

    let replay = replay_seed(args.seed, &config)?;
    let series = &replay.output.series;

    let out = ReplayOutput {
        seed: args.seed,
        steps: series.len().saturating_sub(1),
        oracle_passed: replay.oracle.passed,
        violations: replay
            .oracle
            .violations
            .iter()
            .map(format_violation)
            .collect(),
        warnings: replay
            .output
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect(),
        intervention: replay.output.intervention.clone(),
        final_fractions: series.final_fractions(),
        fingerprint: format!("{:016x}", replay.fingerprint),
    };

    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Text => {
            println!(
                "replay seed={} nodes={} steps={}",
                out.seed, config.base.nodes, out.steps
            );
            println!(
                "result oracle_passed={} violations={} fingerprint={}",
                out.oracle_passed,
                out.violations.len(),
                out.fingerprint
            );
            if let Some(intervention) = &out.intervention {
                println!(
                    "intervention step={} requested={} seeded={} eligible={}",
                    intervention.step,
                    intervention.requested(),
                    intervention.seeded(),
                    intervention.eligible
                );
            }
            for violation in &out.violations {
                println!("violation={violation}");
            }
            for warning in &out.warnings {
                println!("warning={warning}");
            }
            for t in 0..series.len() {
                if let Some(f) = series.at(t) {
                    println!(
                        "t={t} S={:.6} I={:.6} D={:.6} R={:.6}",
                        f.susceptible, f.spreader, f.debunker, f.recovered
                    );
                }
            }
        }
        OutputMode::Pretty => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            pretty_section(&mut w, &format!("Replay Seed {}", out.seed))?;
            pretty_kv(&mut w, "Nodes", config.base.nodes.to_string())?;
            pretty_kv(&mut w, "Steps", out.steps.to_string())?;
            if let Some(intervention) = &out.intervention {
                pretty_kv(
                    &mut w,
                    "Seeded",
                    format!(
                        "{} of {} at step {} ({} eligible)",
                        intervention.seeded(),
                        intervention.requested(),
                        intervention.step,
                        intervention.eligible
                    ),
                )?;
            }
            if let Some(last) = &out.final_fractions {
                pretty_kv(
                    &mut w,
                    "Final",
                    format!(
                        "S {}  I {}  D {}  R {}",
                        percent(last.susceptible),
                        percent(last.spreader),
                        percent(last.debunker),
                        percent(last.recovered)
                    ),
                )?;
            }
            pretty_kv(&mut w, "Fingerprint", &out.fingerprint)?;
            pretty_kv(&mut w, "Oracle", out.oracle_passed.to_string())?;

            if !out.oracle_passed {
                println!();
                pretty_section(&mut w, "Invariant Violations")?;
                for violation in &out.violations {
                    println!("- {violation}");
                }
            }
            if !out.warnings.is_empty() {
                println!();
                pretty_section(&mut w, "Warnings")?;
                for warning in &out.warnings {
                    println!("- {warning}");
                }
            }
        }
    }

    if !replay.oracle.passed {
        process::exit(1);
    }

    Ok(())
}
