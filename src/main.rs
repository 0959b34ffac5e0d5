use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::args::Cli;

/// Logs go to stderr so command output stays clean on stdout.
/// `RUST_LOG` wins over `--verbose` when set.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "rosterx=debug" } else { "rosterx=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    commands::run(cli)
}
