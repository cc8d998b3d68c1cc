//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use crate::commands::Command;

/// spamctl - referrer spam filter management
///
/// Keeps the referrer spam exclude filters of analytics accounts in sync
/// with community maintained spam domain lists.
#[derive(Parser, Debug)]
#[command(name = "spamctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", env = "SPAMCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Log file path
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<String>,

    /// Machine readable output, errors only in the log
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::filters::FiltersCommand;

    #[test]
    fn test_verbose() {
        let args = Args::parse_from(["spamctl", "-v", "domains", "list"]);
        assert_eq!(args.verbose, 1);

        let args = Args::parse_from(["spamctl", "domains", "list", "-vvv"]);
        assert_eq!(args.verbose, 3);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["spamctl", "filters", "show", "12345", "-q", "-c", "x.toml"]);
        assert!(args.quiet);
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));

        match args.command {
            Command::Filters(filters) => match filters.command {
                FiltersCommand::Show { account } => assert_eq!(account.as_deref(), Some("12345")),
                other => panic!("unexpected command: {:?}", other),
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_requires_account() {
        assert!(Args::try_parse_from(["spamctl", "filters", "update"]).is_err());
        let args = Args::parse_from(["spamctl", "filters", "update", "1", "--dry-run"]);
        assert!(matches!(
            args.command,
            Command::Filters(ref f) if matches!(f.command, FiltersCommand::Update { dry_run: true, .. })
        ));
    }
}
