//! E2E tests for `rumor run`, `rumor graph`, and `rumor config`.
//!
//! Covers: JSON schema of a run, determinism across invocations, text
//! output, parameter validation, and config file round-trips.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn rumor_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rumor"));
    cmd.env("RUMOR_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

const SMALL: [&str; 10] = [
    "--nodes",
    "100",
    "--steps",
    "20",
    "--intervention-step",
    "5",
    "--initial-spreaders",
    "5",
    "--initial-debunkers",
    "5",
];

fn run_json(extra: &[&str]) -> Value {
    let output = rumor_cmd()
        .arg("run")
        .args(SMALL)
        .args(extra)
        .args(["--format", "json"])
        .output()
        .expect("run should not crash");
    assert!(
        output.status.success(),
        "rumor run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("run --format json must produce valid JSON")
}

// ---------------------------------------------------------------------------
// rumor run
// ---------------------------------------------------------------------------

#[test]
fn run_json_has_series_and_final_vectors() {
    let json = run_json(&["--seed", "42"]);

    for key in ["S_frac", "I_frac", "D_frac", "R_frac"] {
        let column = json["series"][key]
            .as_array()
            .unwrap_or_else(|| panic!("series.{key} must be an array"));
        assert_eq!(column.len(), 21, "series.{key} length");
    }
    assert_eq!(json["final_states"].as_array().map(Vec::len), Some(100));
    assert_eq!(json["final_kinds"].as_array().map(Vec::len), Some(100));
    assert_eq!(json["config"]["seed"], 42);
    assert_eq!(json["network"]["node_count"], 100);
    assert_eq!(json["intervention"]["step"], 5);
    assert!(json["peak_spreader"]["fraction"].as_f64().is_some());
    assert!(json["fingerprint"].as_str().is_some());

    let d = json["series"]["D_frac"].as_array().expect("D_frac");
    assert_eq!(d[4].as_f64(), Some(0.0));
    assert!(d[5].as_f64().expect("number") > 0.0);
}

#[test]
fn run_is_deterministic_for_a_seed() {
    let a = run_json(&["--seed", "9"]);
    let b = run_json(&["--seed", "9"]);
    assert_eq!(a["fingerprint"], b["fingerprint"]);
    assert_eq!(a["series"], b["series"]);

    let c = run_json(&["--seed", "10"]);
    assert_ne!(a["fingerprint"], c["fingerprint"]);
}

#[test]
fn run_text_output_is_key_value() {
    rumor_cmd()
        .arg("run")
        .args(SMALL)
        .args(["--seed", "1", "--format", "text", "--series"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run seed=1 nodes=100"))
        .stdout(predicate::str::contains("intervention step=5"))
        .stdout(predicate::str::contains("final S="))
        .stdout(predicate::str::contains("t=20 S="));
}

#[test]
fn run_pretty_output_has_sections() {
    rumor_cmd()
        .arg("run")
        .args(SMALL)
        .args(["--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rumor Run (seed 0)"))
        .stdout(predicate::str::contains("Peak I:"));
}

#[test]
fn run_rejects_invalid_probability() {
    rumor_cmd()
        .arg("run")
        .args(SMALL)
        .args(["--alpha-i", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha_i"));
}

#[test]
fn run_rejects_late_intervention() {
    rumor_cmd()
        .args(["run", "--steps", "10", "--intervention-step", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("intervention_step"));
}

#[test]
fn run_reads_config_file_and_flags_override_it() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("run.toml");
    std::fs::write(
        &path,
        "nodes = 150\nsteps = 12\nintervention_step = 4\nseed = 5\n",
    )
    .expect("write config");

    let output = rumor_cmd()
        .args(["run", "--config"])
        .arg(&path)
        .args(["--steps", "8", "--format", "json"])
        .output()
        .expect("run should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["config"]["nodes"], 150);
    assert_eq!(json["config"]["steps"], 8);
    assert_eq!(json["config"]["seed"], 5);
    assert_eq!(json["series"]["S_frac"].as_array().map(Vec::len), Some(9));
}

#[test]
fn run_reports_unknown_config_key() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "nodez = 10\n").expect("write config");

    rumor_cmd()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.toml"));
}

// ---------------------------------------------------------------------------
// rumor graph
// ---------------------------------------------------------------------------

#[test]
fn graph_json_stats() {
    let output = rumor_cmd()
        .args(["graph", "--nodes", "300", "-m", "2", "--top", "3", "--format", "json"])
        .output()
        .expect("graph should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["node_count"], 300);
    // m(m+1)/2 + (N - m - 1) * m
    assert_eq!(json["edge_count"], 3 + 297 * 2);
    assert_eq!(json["component_count"], 1);
    assert_eq!(json["top"].as_array().map(Vec::len), Some(3));
}

#[test]
fn graph_matches_run_network() {
    let output = rumor_cmd()
        .args(["graph", "--nodes", "100", "--seed", "42", "--format", "json"])
        .output()
        .expect("graph should not crash");
    let graph: Value = serde_json::from_slice(&output.stdout).expect("json");
    let run = run_json(&["--seed", "42"]);
    assert_eq!(graph["edge_count"], run["network"]["edge_count"]);
    assert_eq!(graph["max_degree"], run["network"]["max_degree"]);
    assert_eq!(graph["hub"], run["network"]["hub"]);
}

#[test]
fn graph_rejects_too_many_edges() {
    rumor_cmd()
        .args(["graph", "--nodes", "3", "-m", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("edges_per_node"));
}

// ---------------------------------------------------------------------------
// rumor config
// ---------------------------------------------------------------------------

#[test]
fn config_prints_defaults_as_toml() {
    rumor_cmd()
        .args(["config", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes = 5000"))
        .stdout(predicate::str::contains("official_ratio = 0.1"));
}

#[test]
fn config_rejects_seed_beyond_toml_range() {
    rumor_cmd()
        .args(["config", "--format", "text", "--seed", "18446744073709551615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("seed"));

    rumor_cmd()
        .args(["config", "--format", "text", "--seed", "9223372036854775807"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed = 9223372036854775807"));
}

#[test]
fn config_output_round_trips_through_run() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("saved.toml");

    let output = rumor_cmd()
        .args(["config", "--format", "text"])
        .args(SMALL)
        .args(["--seed", "3"])
        .output()
        .expect("config should not crash");
    assert!(output.status.success());
    std::fs::write(&path, &output.stdout).expect("save config");

    let output = rumor_cmd()
        .args(["run", "--format", "json", "--config"])
        .arg(&path)
        .output()
        .expect("run should not crash");
    assert!(output.status.success());
    let from_file: Value = serde_json::from_slice(&output.stdout).expect("json");
    let direct = run_json(&["--seed", "3"]);
    assert_eq!(from_file["fingerprint"], direct["fingerprint"]);
}
