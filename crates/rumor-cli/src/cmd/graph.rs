//! `rumor graph` — generate a contact network and summarize it.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use rumor_graph::{GraphStats, generate};
use rumor_sim::rng::{Stream, stream_rng};

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `rumor graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Number of nodes.
    #[arg(long, default_value = "5000")]
    pub nodes: usize,

    /// Edges each new node forms.
    #[arg(short = 'm', long, default_value = "2")]
    pub edges_per_node: usize,

    /// Master seed; the same seed yields the network `rumor run` uses.
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Also list the highest-degree nodes.
    #[arg(long, value_name = "K")]
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HubEntry {
    node: usize,
    degree: usize,
}

#[derive(Debug, Serialize)]
struct GraphReport {
    seed: u64,
    edges_per_node: usize,
    #[serde(flatten)]
    stats: GraphStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    top: Vec<HubEntry>,
}

/// Execute `rumor graph`.
pub fn run_graph(args: &GraphArgs, output: OutputMode) -> Result<()> {
    let mut rng = stream_rng(args.seed, Stream::Topology);
    let graph = generate(args.nodes, args.edges_per_node, &mut rng)
        .context("network generation failed")?;

    let top = args.top.map_or_else(Vec::new, |k| {
        let mut by_degree: Vec<HubEntry> = (0..graph.node_count())
            .map(|node| HubEntry {
                node,
                degree: graph.degree(node),
            })
            .collect();
        by_degree.sort_by_key(|entry| (std::cmp::Reverse(entry.degree), entry.node));
        by_degree.truncate(k);
        by_degree
    });

    let report = GraphReport {
        seed: args.seed,
        edges_per_node: args.edges_per_node,
        stats: GraphStats::from_graph(&graph),
        top,
    };

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &GraphReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &report.stats;
    writeln!(
        w,
        "graph seed={} nodes={} edges={} edges_per_node={}",
        report.seed, s.node_count, s.edge_count, report.edges_per_node
    )?;
    writeln!(
        w,
        "degree min={} max={} mean={:.3} hub={}",
        s.min_degree,
        s.max_degree,
        s.mean_degree,
        s.hub.map_or_else(|| "none".to_string(), |h| h.to_string())
    )?;
    writeln!(
        w,
        "structure density={:.6} components={} isolated={}",
        s.density, s.component_count, s.isolated_node_count
    )?;
    for entry in &report.top {
        writeln!(w, "hub node={} degree={}", entry.node, entry.degree)?;
    }
    Ok(())
}

fn render_pretty(report: &GraphReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &report.stats;
    pretty_section(w, &format!("Network (seed {})", report.seed))?;
    pretty_kv(w, "Nodes", s.node_count.to_string())?;
    pretty_kv(
        w,
        "Edges",
        format!("{} (m = {})", s.edge_count, report.edges_per_node),
    )?;
    pretty_kv(
        w,
        "Degree",
        format!(
            "min {}  max {}  mean {:.2}",
            s.min_degree, s.max_degree, s.mean_degree
        ),
    )?;
    if let Some(hub) = s.hub {
        pretty_kv(w, "Hub", format!("node {hub}"))?;
    }
    pretty_kv(w, "Density", format!("{:.6}", s.density))?;
    pretty_kv(w, "Components", s.component_count.to_string())?;
    if !report.top.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Top Degree")?;
        for entry in &report.top {
            writeln!(w, "node {:<8} degree={}", entry.node, entry.degree)?;
        }
    }
    Ok(())
}
