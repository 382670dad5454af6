#![no_main]

use libfuzzer_sys::fuzz_target;
use rumor_sim::oracle::check_run;
use rumor_sim::{SimulationConfig, simulate};

fn probability(byte: u8) -> f64 {
    f64::from(byte) / 255.0
}

// Every valid small configuration must run to completion and pass the oracle.
fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }
    let nodes = 2 + usize::from(data[0] % 120);
    let steps = 1 + usize::from(data[1] % 25);
    let config = SimulationConfig {
        seed: u64::from_le_bytes([
            data[2], data[3], data[4], data[5], data[6], data[7], data[8], data[9],
        ]),
        nodes,
        edges_per_node: usize::from(data[10] % 4) % nodes,
        initial_spreaders: usize::from(data[11]) % (nodes + 1),
        steps,
        intervention_step: 1 + usize::from(data[12]) % steps,
        initial_debunkers: usize::from(data[13]) % (nodes + 1),
        official_ratio: probability(data[14]),
        official_layers: usize::from(data[15] % 4),
        opinion_layers: usize::from(data[15] / 64),
        alpha_i: probability(*data.get(16).unwrap_or(&25)),
        alpha_r: probability(*data.get(17).unwrap_or(&200)),
        alpha_d: probability(*data.get(18).unwrap_or(&25)),
        beta_d: probability(*data.get(19).unwrap_or(&150)),
        delta: probability(*data.get(20).unwrap_or(&128)),
    };
    if config.validate().is_err() {
        return;
    }
    let output = simulate(config).expect("valid config runs");
    let result = check_run(&output);
    assert!(result.passed, "{:?}", result.violations);
});
