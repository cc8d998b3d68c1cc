//! In-memory filter provider

use super::FilterProvider;
use crate::error::{Error, Result};
use crate::filter::{ExistingFilter, FilterSpec};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filters of all accounts plus the identifier sequence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterStore {
    /// Last identifier handed out
    pub last_id: u64,
    /// Filters per account
    pub accounts: BTreeMap<String, Vec<ExistingFilter>>,
}

impl FilterStore {
    /// Make sure an account exists
    pub fn add_account(&mut self, account: impl Into<String>) {
        self.accounts.entry(account.into()).or_default();
    }

    pub(crate) fn account_ids(&self) -> Vec<String> {
        self.accounts.keys().cloned().collect()
    }

    pub(crate) fn list(&self, account: &str) -> Vec<ExistingFilter> {
        self.accounts.get(account).cloned().unwrap_or_default()
    }

    pub(crate) fn create(&mut self, account: &str, spec: &FilterSpec) -> ExistingFilter {
        self.last_id += 1;
        let filter = ExistingFilter::new(self.last_id.to_string(), spec.clone());
        self.accounts
            .entry(account.to_string())
            .or_default()
            .push(filter.clone());
        filter
    }

    pub(crate) fn update(
        &mut self,
        account: &str,
        id: &str,
        spec: &FilterSpec,
    ) -> Result<ExistingFilter> {
        let filter = self
            .accounts
            .get_mut(account)
            .and_then(|filters| filters.iter_mut().find(|f| f.id == id))
            .ok_or_else(|| Error::FilterNotFound {
                account: account.to_string(),
                id: id.to_string(),
            })?;

        filter.spec = spec.clone();
        Ok(filter.clone())
    }

    pub(crate) fn remove(&mut self, account: &str, id: &str) -> Result<()> {
        let not_found = || Error::FilterNotFound {
            account: account.to_string(),
            id: id.to_string(),
        };

        let filters = self.accounts.get_mut(account).ok_or_else(not_found)?;
        let position = filters.iter().position(|f| f.id == id).ok_or_else(not_found)?;
        filters.remove(position);
        Ok(())
    }
}

/// Provider keeping all filters in memory
///
/// Counts mutating calls so callers can verify that a converged state
/// produces no further writes.
#[derive(Debug, Default)]
pub struct MemoryFilterProvider {
    store: Mutex<FilterStore>,
    mutations: Mutex<usize>,
}

impl MemoryFilterProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with the given accounts and no filters
    pub fn with_accounts<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = FilterStore::default();
        for account in accounts {
            store.add_account(account);
        }
        Self::from_store(store)
    }

    /// Wrap an existing store
    pub fn from_store(store: FilterStore) -> Self {
        Self {
            store: Mutex::new(store),
            mutations: Mutex::new(0),
        }
    }

    /// Number of create, update and remove calls so far
    pub fn mutations(&self) -> usize {
        *self.mutations.lock()
    }

    /// Copy of the current store
    pub fn snapshot(&self) -> FilterStore {
        self.store.lock().clone()
    }

    fn count(&self) {
        *self.mutations.lock() += 1;
    }
}

impl FilterProvider for MemoryFilterProvider {
    fn accounts(&self) -> Result<Vec<String>> {
        Ok(self.store.lock().account_ids())
    }

    fn list(&self, account: &str) -> Result<Vec<ExistingFilter>> {
        Ok(self.store.lock().list(account))
    }

    fn create(&self, account: &str, spec: &FilterSpec) -> Result<ExistingFilter> {
        self.count();
        Ok(self.store.lock().create(account, spec))
    }

    fn update(&self, account: &str, id: &str, spec: &FilterSpec) -> Result<ExistingFilter> {
        self.count();
        self.store.lock().update(account, id, spec)
    }

    fn remove(&self, account: &str, id: &str) -> Result<()> {
        self.count();
        self.store.lock().remove(account, id)
    }
}
