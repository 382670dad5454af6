//! `rumor config` — print the effective configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cmd::{ParamOverrides, resolve_config};
use crate::output::OutputMode;

/// Arguments for `rumor config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// TOML configuration file to start from instead of the defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Master seed, at most 9223372036854775807 (the largest TOML integer).
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub params: ParamOverrides,
}

/// Execute `rumor config`.
///
/// Prints TOML in pretty and text mode so the output can be saved and fed
/// back through `--config`.
pub fn run_config(args: &ConfigArgs, output: OutputMode) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.params, args.seed)?;

    if output.is_json() {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        let text = config.to_toml().context("rendering config as TOML")?;
        print!("{text}");
    }
    Ok(())
}
