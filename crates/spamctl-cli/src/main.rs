//! spamctl CLI
//!
//! Command-line interface for managing referrer spam filters.

mod args;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(&args)?;

    let result = run(args);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    let globals = commands::Globals {
        config: args.config,
        quiet: args.quiet,
    };

    match args.command {
        commands::Command::Filters(filters_args) => {
            commands::filters::execute(filters_args, &globals)
        }
        commands::Command::Domains(domains_args) => {
            commands::domains::execute(domains_args, &globals)
        }
        commands::Command::Accounts(accounts_args) => {
            commands::accounts::execute(accounts_args, &globals)
        }
        commands::Command::Config(config_args) => {
            commands::config::execute(config_args, &globals)
        }
        commands::Command::Completions(comp_args) => {
            commands::completions::execute(comp_args)
        }
    }
}
