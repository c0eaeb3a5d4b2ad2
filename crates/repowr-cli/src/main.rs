//! repOWR CLI: the `repowr` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = support::load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Validate { memo, json } => commands::validate::run(memo, config.protocol, json),

        Commands::Address { address, json } => commands::address::run(address, config.address, json),

        Commands::Ingest {
            transfers,
            store,
            limit,
            json,
        } => commands::ingest::run(transfers, store, limit, config, json),

        Commands::Reputation {
            address,
            store,
            json,
        } => commands::reputation::run(address, store, config, json),

        Commands::Reviews {
            address,
            store,
            limit,
            json,
        } => commands::reviews::run(address, store, limit, config, json),

        Commands::Top { store, count, json } => commands::top::run(store, count, config, json),
    }
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
