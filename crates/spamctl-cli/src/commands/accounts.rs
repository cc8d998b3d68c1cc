//! Account commands for the local filter store

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use spamctl_core::FilterProvider;

use super::Globals;

/// Account command arguments
#[derive(Args, Debug)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

/// Account subcommands
#[derive(Subcommand, Debug)]
pub enum AccountsCommand {
    /// List all accounts of the filter store
    List,

    /// Register an account in the filter store
    Add {
        /// Account identifier
        account: String,
    },
}

/// Execute account command
pub fn execute(args: AccountsArgs, globals: &Globals) -> Result<()> {
    let config = globals.load_config()?;
    let provider = globals.provider(&config);

    match args.command {
        AccountsCommand::List => {
            let accounts = provider.accounts().context("Failed to list accounts")?;
            if accounts.is_empty() && !globals.quiet {
                println!("{}", "No accounts. Add one with 'accounts add'".yellow());
            }
            for account in accounts {
                println!("{}", account);
            }
        }
        AccountsCommand::Add { account } => {
            provider
                .add_account(&account)
                .with_context(|| format!("Failed to add account {}", account))?;
            if !globals.quiet {
                println!(
                    "{} Added account {} to {}",
                    "✓".green(),
                    account.cyan(),
                    provider.path().display()
                );
            }
        }
    }

    Ok(())
}
