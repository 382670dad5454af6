//! `rumor run` — simulate one trajectory.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::debug;

use rumor_sim::{RunOutput, TimeSeries, simulate};

use crate::cmd::{ParamOverrides, resolve_config};
use crate::output::{OutputMode, percent, pretty_kv, pretty_section, render_mode};

/// Arguments for `rumor run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// TOML configuration file; flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Master seed, at most 9223372036854775807 (the largest TOML integer).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the per-step series in pretty and text output.
    #[arg(long)]
    pub series: bool,

    #[command(flatten)]
    pub params: ParamOverrides,
}

/// Largest spreader share and when it occurred.
#[derive(Debug, Serialize)]
struct Peak {
    step: usize,
    fraction: f64,
}

/// JSON output for `rumor run`: the full run plus derived summaries.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    #[serde(flatten)]
    output: &'a RunOutput,
    peak_spreader: Option<Peak>,
    fingerprint: String,
}

/// Execute `rumor run`.
pub fn run_run(args: &RunArgs, output: OutputMode) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.params, args.seed)?;
    debug!(?config, "resolved configuration");

    let result = simulate(config)?;
    let report = RunReport {
        output: &result,
        peak_spreader: result
            .series
            .peak_spreader()
            .map(|(step, fraction)| Peak { step, fraction }),
        fingerprint: format!("{:016x}", result.fingerprint()),
    };

    render_mode(
        output,
        &report,
        |r, w| render_text(r, args.series, w),
        |r, w| render_pretty(r, args.series, w),
    )
}

fn render_text(report: &RunReport<'_>, with_series: bool, w: &mut dyn Write) -> io::Result<()> {
    let out = report.output;
    let config = &out.config;
    writeln!(
        w,
        "run seed={} nodes={} edges_per_node={} steps={} intervention_step={} initial_debunkers={}",
        config.seed,
        config.nodes,
        config.edges_per_node,
        config.steps,
        config.intervention_step,
        config.initial_debunkers
    )?;
    writeln!(
        w,
        "network edges={} mean_degree={:.3} max_degree={} components={}",
        out.network.edge_count,
        out.network.mean_degree,
        out.network.max_degree,
        out.network.component_count
    )?;
    if let Some(intervention) = &out.intervention {
        writeln!(
            w,
            "intervention step={} officials={} opinion_leaders={} eligible={}",
            intervention.step,
            intervention.officials.len(),
            intervention.opinion_leaders.len(),
            intervention.eligible
        )?;
    }
    if let Some(peak) = &report.peak_spreader {
        writeln!(w, "peak_spreader step={} fraction={:.6}", peak.step, peak.fraction)?;
    }
    if let Some(last) = out.series.final_fractions() {
        writeln!(
            w,
            "final S={:.6} I={:.6} D={:.6} R={:.6}",
            last.susceptible, last.spreader, last.debunker, last.recovered
        )?;
    }
    writeln!(w, "fingerprint={}", report.fingerprint)?;
    for warning in &out.warnings {
        writeln!(w, "warning={warning}")?;
    }
    if with_series {
        write_series_rows(&out.series, w, |t, s, i, d, r| {
            format!("t={t} S={s:.6} I={i:.6} D={d:.6} R={r:.6}")
        })?;
    }
    Ok(())
}

fn render_pretty(report: &RunReport<'_>, with_series: bool, w: &mut dyn Write) -> io::Result<()> {
    let out = report.output;
    let config = &out.config;
    pretty_section(w, &format!("Rumor Run (seed {})", config.seed))?;
    pretty_kv(
        w,
        "Network",
        format!(
            "{} nodes, {} edges, max degree {}",
            out.network.node_count, out.network.edge_count, out.network.max_degree
        ),
    )?;
    pretty_kv(
        w,
        "Seeds",
        format!(
            "{} spreaders at t=0, {} debunkers at t={}",
            config.initial_spreaders, config.initial_debunkers, config.intervention_step
        ),
    )?;
    if let Some(intervention) = &out.intervention {
        pretty_kv(
            w,
            "Debunkers",
            format!(
                "{} officials ({} hops), {} opinion leaders ({} hops)",
                intervention.officials.len(),
                config.official_layers,
                intervention.opinion_leaders.len(),
                config.opinion_layers
            ),
        )?;
    }
    if let Some(peak) = &report.peak_spreader {
        pretty_kv(
            w,
            "Peak I",
            format!("{} at step {}", percent(peak.fraction), peak.step),
        )?;
    }
    if let Some(last) = out.series.final_fractions() {
        pretty_kv(
            w,
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
    pretty_kv(w, "Fingerprint", &report.fingerprint)?;

    if !out.warnings.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Warnings")?;
        for warning in &out.warnings {
            writeln!(w, "- {warning}")?;
        }
    }

    if with_series {
        writeln!(w)?;
        pretty_section(w, "Series")?;
        writeln!(
            w,
            "{:>5}  {:>8}  {:>8}  {:>8}  {:>8}",
            "t", "S", "I", "D", "R"
        )?;
        write_series_rows(&out.series, w, |t, s, i, d, r| {
            format!("{t:>5}  {s:>8.4}  {i:>8.4}  {d:>8.4}  {r:>8.4}")
        })?;
    }
    Ok(())
}

fn write_series_rows(
    series: &TimeSeries,
    w: &mut dyn Write,
    row: impl Fn(usize, f64, f64, f64, f64) -> String,
) -> io::Result<()> {
    for t in 0..series.len() {
        if let Some(f) = series.at(t) {
            writeln!(
                w,
                "{}",
                row(t, f.susceptible, f.spreader, f.debunker, f.recovered)
            )?;
        }
    }
    Ok(())
}
