#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "rumor: two-stage rumor spreading simulator with debunking intervention",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and environment.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Simulate one rumor trajectory",
        long_about = "Grow a scale-free network, seed spreaders, and run the two-stage\n\
                      dynamics: plain contagion until the intervention step, then official\n\
                      and opinion-leader debunking with boosted transition rates.",
        after_help = "EXAMPLES:\n    # Reference run with defaults\n    rumor run\n\n\
                      # Smaller network, earlier intervention\n    rumor run --nodes 1000 --intervention-step 5 --seed 7\n\n\
                      # Parameters from a file, full series as JSON\n    rumor run --config run.toml --format json"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        about = "Generate a network and print its statistics",
        after_help = "EXAMPLES:\n    # Network used by `rumor run --seed 3`\n    rumor graph --seed 3\n\n\
                      # Ten best-connected nodes\n    rumor graph --nodes 2000 -m 3 --top 10"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        about = "Run the invariant oracle across a range of seeds",
        long_about = "Run the same configuration under many seeds and check each run:\n\
                      fractions sum to one, recovered never shrinks, no debunkers before\n\
                      the intervention step, and the seeded count matches min(D0, eligible).\n\
                      Exits with status 1 if any seed fails.",
        after_help = "EXAMPLES:\n    # 50 seeds on a small network\n    rumor check --seeds 50 --nodes 500\n\n\
                      # Machine-readable output\n    rumor check --seeds 100 --format json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        about = "Replay one seed with oracle details",
        after_help = "EXAMPLES:\n    # Replay seed 42\n    rumor replay --seed 42\n\n\
                      # Replay with the campaign's parameters\n    rumor replay --seed 42 --config run.toml"
    )]
    Replay(cmd::check::ReplayArgs),

    #[command(
        about = "Print the effective configuration as TOML",
        after_help = "EXAMPLES:\n    # Start a config file from the defaults\n    rumor config > run.toml\n\n\
                      # Check a file with overrides applied\n    rumor config --config run.toml --steps 80"
    )]
    Config(cmd::config::ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RUMOR_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "rumor=debug,info"
        } else {
            "rumor=info,warn"
        })
    });

    let format = env::var("RUMOR_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    match &cli.command {
        Commands::Run(args) => cmd::run::run_run(args, output),
        Commands::Graph(args) => cmd::graph::run_graph(args, output),
        Commands::Check(args) => cmd::check::run_check(args, output),
        Commands::Replay(args) => cmd::check::run_replay(args, output),
        Commands::Config(args) => cmd::config::run_config(args, output),
    }
}
