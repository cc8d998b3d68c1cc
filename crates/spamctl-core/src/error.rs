//! Error types for spamctl-core
//!
//! Centralized error handling using `thiserror` for ergonomic error definitions.

use crate::status::Status;
use thiserror::Error;

/// Main error type for spamctl-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A domain name was empty or whitespace-only
    #[error("Invalid domain name {name:?}: domain names cannot be empty")]
    InvalidDomainName {
        /// The rejected value
        name: String,
    },

    /// A single escaped domain name does not fit into any segment
    #[error("The domain name {domain:?} is too long to fit into a segment (max length: {max_length})")]
    SegmentOverflow {
        /// Offending domain
        domain: String,
        /// Configured maximum expression length
        max_length: usize,
    },

    /// A domain source failed to deliver its list
    #[error("Domain source '{source_name}' failed: {message}")]
    Source {
        /// Name of the source (URL or path)
        source_name: String,
        /// Error message
        message: String,
    },

    /// A remote list answered with a non-success status code
    #[error("Failed to get URL {url:?}: received HTTP status code {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Received status code
        status: u16,
    },

    /// Transport level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filter provider failure
    #[error("Filter provider error: {0}")]
    Provider(String),

    /// Account is not known to the provider
    #[error("Account {account:?} not found")]
    AccountNotFound {
        /// Account identifier
        account: String,
    },

    /// Filter with the given id does not exist
    #[error("Filter {id:?} not found in account {account}")]
    FilterNotFound {
        /// Account identifier
        account: String,
        /// Filter identifier
        id: String,
    },

    /// A status outside the actionable set reached the orchestrator
    #[error("Filter {filter:?} has unexpected status '{status}'")]
    UnexpectedStatus {
        /// Filter name
        filter: String,
        /// Offending status
        status: Status,
    },

    /// Domain snapshot does not exist
    #[error("Domain snapshot not found: {path}")]
    SnapshotNotFound {
        /// Snapshot path
        path: String,
    },

    /// A domain list was read but contained no entries
    #[error("No domains found in {path:?}")]
    NoDomains {
        /// Location that was read
        path: String,
    },

    /// A domain update produced no entries at all
    #[error("No domains received")]
    NoDomainsReceived,

    /// Interactive review failed
    #[error("Review failed: {0}")]
    Review(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the missing config file
        path: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filter expression failed to compile
    #[error("Invalid filter expression: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a source error
    pub fn source(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a config value error
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SegmentOverflow {
            domain: "very-long.example".to_string(),
            max_length: 10,
        };
        assert!(err.to_string().contains("very-long.example"));
        assert!(err.to_string().contains("10"));

        let err = Error::source("https://lists.example/spam.txt", "connection refused");
        assert!(err.to_string().contains("lists.example"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_unexpected_status_names_filter_and_kind() {
        let err = Error::UnexpectedStatus {
            filter: "Referrer Spam Block #001".to_string(),
            status: Status::Unknown,
        };
        let text = err.to_string();
        assert!(text.contains("Referrer Spam Block #001"));
        assert!(text.contains("unknown"));
    }
}
