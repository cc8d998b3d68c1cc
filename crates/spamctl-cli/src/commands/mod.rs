//! CLI commands

pub mod accounts;
pub mod completions;
pub mod config;
pub mod domains;
pub mod filters;

use anyhow::{Context, Result};
use clap::Subcommand;
use spamctl_core::{Config, JsonFileFilterProvider, SpamControl};
use std::path::PathBuf;
use tracing::debug;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show, update and remove the spam filters of an account
    Filters(filters::FiltersArgs),

    /// Manage the known spam domains
    Domains(domains::DomainsArgs),

    /// Manage the accounts of the local filter store
    Accounts(accounts::AccountsArgs),

    /// Configuration management
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Options shared by all commands
#[derive(Debug, Clone, Default)]
pub struct Globals {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Machine readable output
    pub quiet: bool,
}

impl Globals {
    /// Load the explicit config file, or the first one found, or defaults
    pub fn load_config(&self) -> Result<Config> {
        let (config, source) = match self.config {
            Some(ref path) => (
                Config::load(path)
                    .with_context(|| format!("Failed to load config from {:?}", path))?,
                Some(path.clone()),
            ),
            None => Config::discover().context("Failed to load config")?,
        };

        config.validate().context("Configuration validation failed")?;
        match source {
            Some(path) => debug!(path = %path.display(), "Loaded configuration"),
            None => debug!("Using default configuration"),
        }
        Ok(config)
    }

    /// Filter store configured in `config`
    pub fn provider(&self, config: &Config) -> JsonFileFilterProvider {
        JsonFileFilterProvider::new(&config.provider.store)
    }

    /// Spam control for the configured filter store
    pub fn spam_control(&self) -> Result<SpamControl<JsonFileFilterProvider>> {
        let config = self.load_config()?;
        let provider = self.provider(&config);
        SpamControl::from_config(&config, provider).context("Failed to set up spam control")
    }
}
