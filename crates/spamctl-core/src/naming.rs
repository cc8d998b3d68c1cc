//! Filter naming scheme
//!
//! Names are derived only from the prefix, the shard key and the ordinal
//! within the shard, so an unchanged domain list always maps to the same
//! names. The prefix tells managed filters apart from user-created ones.

/// Prefix used when the configuration does not override it
pub const DEFAULT_PREFIX: &str = "Referrer Spam Block";

/// Generates and recognizes managed filter names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterNamer {
    prefix: String,
}

impl Default for FilterNamer {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl FilterNamer {
    /// Create a namer for the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Configured prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the `ordinal`-th (1-based) filter of a shard
    pub fn name(&self, shard: Option<&str>, ordinal: usize) -> String {
        match shard {
            Some(shard) => format!("{} Segment {} #{:03}", self.prefix, shard, ordinal),
            None => format!("{} #{:03}", self.prefix, ordinal),
        }
    }

    /// Whether a filter with this name is managed by us
    pub fn is_managed(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }
}
