#![forbid(unsafe_code)]

use anyhow::Result;
use rumor_sim::{SimulationConfig, simulate};

fn main() -> Result<()> {
    let output = simulate(SimulationConfig::default())?;
    let last = output.series.final_fractions().unwrap_or_default();
    let (peak_step, peak) = output.series.peak_spreader().unwrap_or_default();

    println!(
        "simulation complete: steps={} peak_I={peak:.4}@{peak_step} final S={:.4} I={:.4} D={:.4} R={:.4} fingerprint={:016x}",
        output.config.steps,
        last.susceptible,
        last.spreader,
        last.debunker,
        last.recovered,
        output.fingerprint()
    );

    Ok(())
}
