//! Config command - configuration management

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use spamctl_core::config::{self, Config};
use std::path::PathBuf;
use tracing::info;

use super::Globals;

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Generate a configuration file with all defaults
    Generate {
        /// Output file path
        #[arg(short, long, default_value = config::CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate (default: detect)
        file: Option<PathBuf>,
    },

    /// Show config and data file locations
    Paths,
}

/// Execute config command
pub fn execute(args: ConfigArgs, globals: &Globals) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(globals),
        ConfigAction::Generate { output, force } => generate_config(output, force),
        ConfigAction::Validate { file } => validate_config(file, globals),
        ConfigAction::Paths => show_paths(globals),
    }
}

fn show_config(globals: &Globals) -> Result<()> {
    let config = globals.load_config()?;
    let toml_str = config.to_toml().context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

fn generate_config(output: PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists, use --force to overwrite", output.display());
    }

    let toml_str = Config::default()
        .to_toml()
        .context("Failed to serialize config")?;

    let content = format!(
        "# spamctl configuration\n\
         # Every key is optional; missing keys use the values below.\n\n\
         {}",
        toml_str
    );

    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    info!("Generated config file: {:?}", output);
    println!("Configuration file generated: {}", output.display());

    Ok(())
}

fn validate_config(file: Option<PathBuf>, globals: &Globals) -> Result<()> {
    let globals = Globals {
        config: file.or_else(|| globals.config.clone()),
        ..globals.clone()
    };
    let config = globals.load_config()?;

    println!("{} Configuration is valid", "✓".green());
    println!("  Filter prefix: {}", config.filters.name_prefix);
    println!("  Max expression length: {}", config.filters.max_expression_length);
    println!("  Remote lists: {}", config.domains.remote.len());
    println!("  Filter store: {}", config.provider.store.display());

    Ok(())
}

fn show_paths(globals: &Globals) -> Result<()> {
    println!("Configuration file search paths:");
    println!();

    if let Some(ref explicit) = globals.config {
        println!("  {} (--config)", explicit.display());
    }
    for (index, path) in config::search_paths().iter().enumerate() {
        let marker = if path.exists() { "✓".green() } else { " ".normal() };
        println!("  {}. {} {}", index + 1, path.display(), marker);
    }

    let config = globals.load_config()?;
    println!();
    println!("Data files:");
    println!();
    println!("  Domain snapshot:  {}", config.domains.snapshot.display());
    println!("  Private domains:  {}", config.domains.private_snapshot.display());
    println!("  Filter store:     {}", config.provider.store.display());

    Ok(())
}
