//! Filter providers
//!
//! A [`FilterProvider`] stores filters per account. The analytics platform is
//! one such provider; this crate ships an in-memory implementation and a
//! JSON-file implementation that stands in for the remote platform.

mod json_file;
mod memory;

pub use json_file::JsonFileFilterProvider;
pub use memory::{FilterStore, MemoryFilterProvider};

use crate::error::Result;
use crate::filter::{ExistingFilter, FilterSpec};
use crate::naming::FilterNamer;
use tracing::debug;

/// CRUD access to the filters of an account
///
/// Implemented by the analytics platform client and by local stores.
#[cfg_attr(test, mockall::automock)]
pub trait FilterProvider {
    /// Identifiers of all accessible accounts
    fn accounts(&self) -> Result<Vec<String>>;

    /// All filters of the account, managed or not
    fn list(&self, account: &str) -> Result<Vec<ExistingFilter>>;

    /// Create a filter and return it with its new identifier
    fn create(&self, account: &str, spec: &FilterSpec) -> Result<ExistingFilter>;

    /// Replace the content of the filter with the given identifier
    fn update(&self, account: &str, id: &str, spec: &FilterSpec) -> Result<ExistingFilter>;

    /// Delete the filter with the given identifier
    fn remove(&self, account: &str, id: &str) -> Result<()>;
}

/// List the filters of `account` that belong to the naming scheme.
///
/// Every other filter is dropped here and never reaches reconciliation.
pub fn list_managed<P: FilterProvider + ?Sized>(
    provider: &P,
    namer: &FilterNamer,
    account: &str,
) -> Result<Vec<ExistingFilter>> {
    let all = provider.list(account)?;
    let total = all.len();

    let managed: Vec<ExistingFilter> = all
        .into_iter()
        .filter(|f| namer.is_managed(f.name()))
        .collect();

    debug!(account, total, managed = managed.len(), "Listed filters");
    Ok(managed)
}
