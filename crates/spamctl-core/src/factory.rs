//! Desired filter generation
//!
//! Turns the current domain list into the list of filters that should exist.

use crate::config::FiltersConfig;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::naming::FilterNamer;
use crate::segment;
use tracing::debug;

/// Builds [`FilterSpec`]s from domain names
#[derive(Debug, Clone)]
pub struct FilterFactory {
    namer: FilterNamer,
    field: String,
    max_expression_length: usize,
    sharding: bool,
}

impl FilterFactory {
    /// Create a factory
    pub fn new(
        namer: FilterNamer,
        field: impl Into<String>,
        max_expression_length: usize,
        sharding: bool,
    ) -> Self {
        Self {
            namer,
            field: field.into(),
            max_expression_length,
            sharding,
        }
    }

    /// Create from the `[filters]` configuration section
    pub fn from_config(config: &FiltersConfig) -> Self {
        Self::new(
            FilterNamer::new(&config.name_prefix),
            &config.field,
            config.max_expression_length,
            config.sharding,
        )
    }

    /// Naming scheme used for generated filters
    pub fn namer(&self) -> &FilterNamer {
        &self.namer
    }

    /// Generate the desired filters for `domains`
    pub fn new_filters<S: AsRef<str>>(&self, domains: &[S]) -> Result<Vec<FilterSpec>> {
        let filters: Vec<FilterSpec> = if self.sharding {
            segment::generate_sharded(domains, self.max_expression_length)?
                .into_iter()
                .flat_map(|(shard, segments)| {
                    segments
                        .into_iter()
                        .enumerate()
                        .map(move |(index, expression)| (Some(shard.clone()), index, expression))
                })
                .map(|(shard, index, expression)| self.spec(shard.as_deref(), index, expression))
                .collect()
        } else {
            segment::generate(domains, self.max_expression_length)?
                .into_iter()
                .enumerate()
                .map(|(index, expression)| self.spec(None, index, expression))
                .collect()
        };

        debug!(domains = domains.len(), filters = filters.len(), "Generated filters");
        Ok(filters)
    }

    fn spec(&self, shard: Option<&str>, index: usize, expression: String) -> FilterSpec {
        FilterSpec::exclude(self.namer.name(shard, index + 1), &self.field, expression)
    }
}
