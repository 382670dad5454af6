use rumor_sim::oracle::check_run;
use rumor_sim::{DebunkerKind, NodeState, RunOutput, SimulationConfig, simulate};

fn reference_scenario(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed,
        nodes: 100,
        edges_per_node: 2,
        initial_spreaders: 5,
        steps: 20,
        intervention_step: 5,
        initial_debunkers: 5,
        official_ratio: 0.4,
        official_layers: 1,
        opinion_layers: 1,
        alpha_i: 0.2,
        alpha_r: 0.3,
        alpha_d: 0.1,
        beta_d: 0.3,
        delta: 0.2,
    }
}

fn run(config: SimulationConfig) -> RunOutput {
    simulate(config).expect("simulation should succeed")
}

#[test]
fn reference_scenario_shape() {
    let output = run(reference_scenario(42));
    let series = &output.series;

    assert_eq!(series.susceptible.len(), 21);
    assert_eq!(series.spreader.len(), 21);
    assert_eq!(series.debunker.len(), 21);
    assert_eq!(series.recovered.len(), 21);

    for t in 0..series.len() {
        let total = series.at(t).expect("sample").total();
        assert!((total - 1.0).abs() < 1e-9, "t={t} total={total}");
    }

    assert!(series.debunker[4].abs() < f64::EPSILON);
    assert!(series.debunker[5] > 0.0);
    assert!((series.spreader[0] - 0.05).abs() < 1e-12);
}

#[test]
fn reference_scenario_passes_oracle() {
    for seed in 0..10 {
        let output = run(reference_scenario(seed));
        let result = check_run(&output);
        assert!(result.passed, "seed {seed}: {:?}", result.violations);
    }
}

#[test]
fn intervention_splits_quota_between_kinds() {
    let output = run(reference_scenario(42));
    let report = output.intervention.expect("intervention ran");
    assert_eq!(report.step, 5);
    // round(5 * 0.4) = 2 officials, 3 opinion leaders.
    assert_eq!(report.officials_requested, 2);
    assert_eq!(report.opinion_leaders_requested, 3);
    assert_eq!(report.seeded(), 5.min(report.eligible));
    assert!(output.warnings.is_empty());
}

#[test]
fn seeded_kinds_are_permanent() {
    let output = run(reference_scenario(9));
    let report = output.intervention.expect("intervention ran");
    for &node in &report.officials {
        assert_eq!(output.final_kinds[node], DebunkerKind::Official);
        assert!(matches!(
            output.final_states[node],
            NodeState::Debunker | NodeState::Recovered
        ));
    }
    for &node in &report.opinion_leaders {
        assert_eq!(output.final_kinds[node], DebunkerKind::OpinionLeader);
    }
}

#[test]
fn identical_configuration_reproduces_exactly() {
    let a = run(reference_scenario(1234));
    let b = run(reference_scenario(1234));
    assert_eq!(a.series, b.series);
    assert_eq!(a.final_states, b.final_states);
    assert_eq!(a.final_kinds, b.final_kinds);
    assert_eq!(a.intervention, b.intervention);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn dynamics_parameters_do_not_change_the_network() {
    let a = run(reference_scenario(5));
    let b = run(SimulationConfig {
        alpha_i: 0.9,
        delta: 0.05,
        ..reference_scenario(5)
    });
    assert_eq!(a.network, b.network);
}

#[test]
fn no_initial_spreaders_means_no_rumor() {
    let output = run(SimulationConfig {
        initial_spreaders: 0,
        ..reference_scenario(3)
    });
    assert!(output.series.spreader.iter().all(|&i| i.abs() < f64::EPSILON));
    // Debunkers seeded into an all-susceptible network still convert their
    // neighbors through alpha_d.
    assert!(output.series.debunker[5] > 0.0);
}

#[test]
fn intervention_at_final_step() {
    let output = run(SimulationConfig {
        intervention_step: 20,
        ..reference_scenario(8)
    });
    assert!(output.series.debunker[..20].iter().all(|&d| d.abs() < f64::EPSILON));
    assert!(output.series.debunker[20] > 0.0);
}

#[test]
fn run_output_serializes_plot_keys() {
    let output = run(reference_scenario(42));
    let json = serde_json::to_value(&output).expect("serialize");
    assert_eq!(json["series"]["S_frac"].as_array().map(Vec::len), Some(21));
    assert_eq!(json["final_states"].as_array().map(Vec::len), Some(100));
    assert_eq!(json["network"]["node_count"], 100);
    assert_eq!(json["intervention"]["step"], 5);
}
