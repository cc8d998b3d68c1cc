//! Configuration management for spamctl
//!
//! Provides a strongly-typed configuration system with TOML support. Every
//! section has defaults, so an empty file is a valid configuration.

use crate::error::{Error, Result};
use crate::filter::DEFAULT_FIELD;
use crate::naming::DEFAULT_PREFIX;
use crate::snapshot::LineEnding;
use crate::sources::DEFAULT_REMOTE_LISTS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name used for per-user directories
pub const APP_NAME: &str = "spamctl";

/// Config file name looked up in the working and user config directories
pub const CONFIG_FILE_NAME: &str = "spamctl.toml";

/// Expression length limit of the analytics platform
pub const DEFAULT_MAX_EXPRESSION_LENGTH: usize = 255;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Filter generation
    pub filters: FiltersConfig,

    /// Domain lists
    pub domains: DomainsConfig,

    /// Filter storage
    pub provider: ProviderConfig,

    /// Interactive review
    pub review: ReviewConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| Error::ConfigNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the first config file found in [`search_paths`], or the defaults
    pub fn discover() -> Result<(Self, Option<PathBuf>)> {
        match search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.filters.name_prefix.trim().is_empty() {
            return Err(Error::config_value(
                "filters.name_prefix",
                "Must not be empty",
            ));
        }

        if self.filters.max_expression_length < 2 {
            return Err(Error::config_value(
                "filters.max_expression_length",
                "Must be at least 2",
            ));
        }

        if self.filters.field.trim().is_empty() {
            return Err(Error::config_value("filters.field", "Must not be empty"));
        }

        for url in &self.domains.remote {
            let parsed = reqwest::Url::parse(url).map_err(|e| {
                Error::config_value("domains.remote", format!("Invalid URL {url:?}: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::config_value(
                    "domains.remote",
                    format!("Unsupported URL scheme in {url:?}"),
                ));
            }
        }

        if self.domains.snapshot == self.domains.private_snapshot {
            return Err(Error::config_value(
                "domains.private_snapshot",
                "Must differ from domains.snapshot",
            ));
        }

        if self.review.editor.trim().is_empty() {
            return Err(Error::config_value("review.editor", "Must not be empty"));
        }

        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Accounts shown in the overview; empty means all accounts of the provider
    pub accounts: Vec<String>,
}

/// Filter generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// Prefix of every managed filter name
    pub name_prefix: String,
    /// Maximum length of one filter expression
    pub max_expression_length: usize,
    /// Traffic field the filters match against
    pub field: String,
    /// Group domains by leading character
    pub sharding: bool,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            name_prefix: DEFAULT_PREFIX.to_string(),
            max_expression_length: DEFAULT_MAX_EXPRESSION_LENGTH,
            field: DEFAULT_FIELD.to_string(),
            sharding: true,
        }
    }
}

/// Domain list settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainsConfig {
    /// Snapshot of the community lists
    pub snapshot: PathBuf,
    /// Snapshot of reviewed, self-collected domains
    pub private_snapshot: PathBuf,
    /// Remote plain-text lists
    pub remote: Vec<String>,
    /// Additional local lists
    pub files: Vec<PathBuf>,
    /// Line terminator for written snapshots
    pub line_ending: LineEnding,
}

impl Default for DomainsConfig {
    fn default() -> Self {
        let data = data_dir();
        Self {
            snapshot: data.join("domains"),
            private_snapshot: data.join("private-domains"),
            remote: DEFAULT_REMOTE_LISTS.iter().map(|s| s.to_string()).collect(),
            files: Vec::new(),
            line_ending: LineEnding::native(),
        }
    }
}

/// Filter storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// JSON document holding accounts and their filters
    pub store: PathBuf,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            store: data_dir().join("filters.json"),
        }
    }
}

/// Interactive review settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Editor command
    pub editor: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        let editor = if cfg!(windows) { "notepad" } else { "vim" };
        Self {
            editor: editor.to_string(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Per-user config directory, if the platform has one
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Per-user data directory; falls back to `./.spamctl`
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".spamctl"))
}

/// Config file candidates in lookup order
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = config_dir() {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    paths
}
