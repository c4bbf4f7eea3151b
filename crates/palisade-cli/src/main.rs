//! palisade CLI: package boundary enforcement for modular Ruby monorepos.
//!
//! This binary provides the `palisade` command with subcommands for checking
//! files, validating and regenerating ledger files, and inspecting constant
//! resolution. See `palisade --help` for usage.

use clap::Parser;
use tracing_subscriber::prelude::*;

mod cli_args;
mod commands;

use cli_args::{Cli, Commands};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "PALISADE_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let formatter: Box<dyn palisade_output::OutputFormatter> = if cli.json {
        Box::new(palisade_output::json::JsonFormatter)
    } else {
        Box::new(palisade_output::human::HumanFormatter)
    };

    let exit_code = match cli.command {
        Commands::Check { files } => commands::check::run(&*formatter, cli.verbose, files),
        Commands::Validate => commands::validate::run(&*formatter, cli.verbose),
        Commands::RegenerateTodo { packs } => {
            commands::regenerate_todo::run(&*formatter, cli.verbose, packs)
        }
        Commands::Init { packs } => commands::init::run(&*formatter, cli.verbose, packs),
        Commands::Resolve { constant, from } => {
            commands::resolve::run(&*formatter, cli.verbose, constant, from)
        }
    };

    std::process::exit(exit_code);
}

/// Log to stderr so stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
