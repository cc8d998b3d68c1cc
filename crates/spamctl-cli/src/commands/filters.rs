//! Filter management commands
//!
//! Show, update and remove the referrer spam filters of an account.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::{ColoredString, Colorize};
use spamctl_core::{FilterStatus, StateOverview, Status};

use super::Globals;

/// Filter management arguments
#[derive(Args, Debug)]
pub struct FiltersArgs {
    #[command(subcommand)]
    pub command: FiltersCommand,
}

/// Filter subcommands
#[derive(Subcommand, Debug)]
pub enum FiltersCommand {
    /// Show filter statuses of one account, or an overview of all accounts
    Show {
        /// Account identifier
        account: Option<String>,
    },

    /// Create, update and remove filters until the account is up to date
    Update {
        /// Account identifier
        account: String,

        /// Only report what would change
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove every managed filter from an account
    Remove {
        /// Account identifier
        account: String,
    },
}

/// Execute filter command
pub fn execute(args: FiltersArgs, globals: &Globals) -> Result<()> {
    match args.command {
        FiltersCommand::Show { account: Some(account) } => show_account(&account, globals),
        FiltersCommand::Show { account: None } => show_overview(globals),
        FiltersCommand::Update { account, dry_run } => update(&account, dry_run, globals),
        FiltersCommand::Remove { account } => remove(&account, globals),
    }
}

fn colored_status(status: Status) -> ColoredString {
    let label = format!("{:<13}", status);
    match status {
        Status::UpToDate => label.green(),
        Status::Outdated | Status::NotInstalled => label.yellow(),
        Status::Obsolete => label.red(),
        Status::NotSet | Status::Unknown => label.dimmed(),
    }
}

fn show_account(account: &str, globals: &Globals) -> Result<()> {
    let control = globals.spam_control()?;

    if globals.quiet {
        let statuses = control
            .filter_statuses(account)
            .with_context(|| format!("Failed to determine filter statuses of {}", account))?;
        for status in &statuses {
            println!("{}\t{}", status.kind, status.name());
        }
        return Ok(());
    }

    let (summary, statuses) = control
        .account_report(account)
        .with_context(|| format!("Failed to determine status of {}", account))?;

    println!("{}", "═".repeat(60).bright_blue());
    println!("{}", format!(" Account {}", account).bright_white().bold());
    println!("{}", "═".repeat(60).bright_blue());
    print_statuses(&statuses);
    println!("{}", "─".repeat(60).bright_black());
    println!("Status:    {}", colored_status(summary.status));
    println!("Filters:   {} up to date", summary.installation);
    println!("Coverage:  {} domains blocked", summary.coverage);
    println!("{}", "═".repeat(60).bright_blue());

    Ok(())
}

fn print_statuses(statuses: &[FilterStatus]) {
    if statuses.is_empty() {
        println!("{}", "  (no filters)".dimmed());
        return;
    }

    for status in statuses {
        println!("  {} {}", colored_status(status.kind), status.name());
    }
}

fn show_overview(globals: &Globals) -> Result<()> {
    let control = globals.spam_control()?;
    let overview = control.overview().context("Failed to collect account statuses")?;

    if globals.quiet {
        for account in &overview.accounts {
            println!("{:<10} {}", account.account, account.status);
        }
        return Ok(());
    }

    print_overview(&overview);
    Ok(())
}

fn print_overview(overview: &StateOverview) {
    println!("Known spam domains: {}", overview.known_domains.to_string().cyan());
    println!();

    if overview.accounts.is_empty() {
        println!("{}", "No accounts. Add one with 'accounts add'".yellow());
        return;
    }

    for account in &overview.accounts {
        println!(
            "{:>30}: {} {:>8}",
            account.account,
            colored_status(account.status),
            format!(
                "{}/{}",
                account.installation.up_to_date, account.installation.total
            )
        );
    }

    println!();
    println!("Overall: {}", colored_status(overview.status));
}

fn update(account: &str, dry_run: bool, globals: &Globals) -> Result<()> {
    let control = globals.spam_control()?;

    let report = if dry_run {
        control.plan_update(account)
    } else {
        control.update_filters(account)
    }
    .with_context(|| format!("Failed to update filters of {}", account))?;

    if globals.quiet {
        println!(
            "{}\t{}\t{}\t{}",
            report.created, report.updated, report.removed, report.unchanged
        );
        return Ok(());
    }

    let verb = if dry_run { "Would apply" } else { "Applied" };
    if report.mutations() == 0 {
        println!("{} Filters of {} are up to date", "✓".green(), account.cyan());
    } else {
        println!("{} {} to {}: {}", "✓".green(), verb, account.cyan(), report);
    }

    Ok(())
}

fn remove(account: &str, globals: &Globals) -> Result<()> {
    let control = globals.spam_control()?;
    let removed = control
        .remove_filters(account)
        .with_context(|| format!("Failed to remove filters of {}", account))?;

    if globals.quiet {
        println!("{}", removed);
    } else {
        println!(
            "{} Removed {} filters from {}",
            "✓".green(),
            removed,
            account.cyan()
        );
    }

    Ok(())
}
