#![no_main]

use libfuzzer_sys::fuzz_target;
use rumor_sim::SimulationConfig;

// Arbitrary text must either fail to parse, fail validation, or produce a
// config that survives a TOML round trip unchanged.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = SimulationConfig::from_toml_str(text) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }
    let Ok(rendered) = config.to_toml() else {
        return;
    };
    let back = SimulationConfig::from_toml_str(&rendered).expect("rendered config parses");
    assert_eq!(back, config);
    assert!(config.official_quota() + config.opinion_quota() == config.initial_debunkers);
});
