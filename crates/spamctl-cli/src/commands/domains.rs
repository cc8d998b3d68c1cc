//! Spam domain commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use spamctl_core::snapshot::parse_lines;
use spamctl_core::sync::{ChangeType, UpdateResult};
use spamctl_core::EditorReviewer;
use std::path::{Path, PathBuf};

use super::Globals;

/// Domain command arguments
#[derive(Args, Debug)]
pub struct DomainsArgs {
    #[command(subcommand)]
    pub command: DomainsCommand,
}

/// Domain subcommands
#[derive(Subcommand, Debug)]
pub enum DomainsCommand {
    /// Print all known spam domains
    List,

    /// Download the configured domain lists and update the snapshot
    Update,

    /// Review candidate domains and add the approved ones to the private list
    Review {
        /// File with one candidate domain per line
        file: PathBuf,

        /// Editor command (default: $VISUAL, $EDITOR, then the configured editor)
        #[arg(short, long)]
        editor: Option<String>,
    },
}

/// Execute domain command
pub fn execute(args: DomainsArgs, globals: &Globals) -> Result<()> {
    match args.command {
        DomainsCommand::List => list(globals),
        DomainsCommand::Update => update(globals),
        DomainsCommand::Review { file, editor } => review(&file, editor, globals),
    }
}

fn list(globals: &Globals) -> Result<()> {
    let control = globals.spam_control()?;
    let domains = control.known_domains().context("Failed to read spam domains")?;

    for domain in &domains {
        println!("{}", domain);
    }
    Ok(())
}

fn update(globals: &Globals) -> Result<()> {
    let control = globals.spam_control()?;
    let result = control.update_domains().context("Failed to update spam domains")?;

    if globals.quiet {
        for entry in &result.domains {
            println!("  {}  {}", entry.change, entry.domain);
        }
    } else {
        print_update(&result);
    }
    Ok(())
}

fn print_update(result: &UpdateResult) {
    let stats = &result.statistics;
    println!(
        "Total: {} | Added (+): {} | Removed (-): {} | Unchanged: {}",
        stats.total,
        stats.added.to_string().green(),
        stats.removed.to_string().red(),
        stats.unchanged
    );
    println!();

    for entry in result.changes() {
        let symbol = match entry.change {
            ChangeType::Added => entry.change.symbol().green(),
            ChangeType::Removed => entry.change.symbol().red(),
            ChangeType::Unchanged => entry.change.symbol().normal(),
        };
        println!("  {}  {}", symbol, entry.domain);
    }
}

/// Editor from the flag, the environment, or the config
fn resolve_editor(flag: Option<String>, configured: &str) -> String {
    flag.or_else(|| std::env::var("VISUAL").ok())
        .or_else(|| std::env::var("EDITOR").ok())
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| configured.to_string())
}

fn review(file: &Path, editor: Option<String>, globals: &Globals) -> Result<()> {
    let config = globals.load_config()?;
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read candidates from {:?}", file))?;
    let candidates = parse_lines(&content);

    let reviewer = EditorReviewer::new(resolve_editor(editor, &config.review.editor));
    let control = spamctl_core::SpamControl::from_config(&config, globals.provider(&config))?;
    let added = control
        .review_domains(&reviewer, &candidates)
        .context("Failed to review domains")?;

    if globals.quiet {
        for domain in &added {
            println!("{}", domain);
        }
        return Ok(());
    }

    if added.is_empty() {
        println!("{}", "No new referrer spam domains added".dimmed());
    } else {
        for domain in &added {
            println!("  {} {}", "+".green(), domain);
        }
        println!(
            "{} Added {} domains to {}",
            "✓".green(),
            added.len(),
            config.domains.private_snapshot.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_config() {
        assert_eq!(resolve_editor(Some("nano".to_string()), "vim"), "nano");
    }
}
