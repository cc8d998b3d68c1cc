//! Filter provider backed by a local JSON document

use super::{FilterProvider, FilterStore};
use crate::error::Result;
use crate::filter::{ExistingFilter, FilterSpec};
use crate::snapshot;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores all accounts and filters in one JSON file
///
/// The file is read before and rewritten after every mutation. A missing
/// file is an empty store.
#[derive(Debug)]
pub struct JsonFileFilterProvider {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileFilterProvider {
    /// Create a provider for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store
    pub fn load(&self) -> Result<FilterStore> {
        if !self.path.exists() {
            return Ok(FilterStore::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace the whole store
    pub fn save(&self, store: &FilterStore) -> Result<()> {
        let content = serde_json::to_string_pretty(store)?;
        snapshot::replace_file(&self.path, content.as_bytes())?;
        debug!(path = %self.path.display(), "Saved filter store");
        Ok(())
    }

    /// Register an account
    pub fn add_account(&self, account: &str) -> Result<()> {
        self.modify(|store| {
            store.add_account(account);
            Ok(())
        })
    }

    fn modify<T>(&self, op: impl FnOnce(&mut FilterStore) -> Result<T>) -> Result<T> {
        let _guard = self.lock.lock();
        let mut store = self.load()?;
        let result = op(&mut store)?;
        self.save(&store)?;
        Ok(result)
    }
}

impl FilterProvider for JsonFileFilterProvider {
    fn accounts(&self) -> Result<Vec<String>> {
        Ok(self.load()?.account_ids())
    }

    fn list(&self, account: &str) -> Result<Vec<ExistingFilter>> {
        Ok(self.load()?.list(account))
    }

    fn create(&self, account: &str, spec: &FilterSpec) -> Result<ExistingFilter> {
        self.modify(|store| Ok(store.create(account, spec)))
    }

    fn update(&self, account: &str, id: &str, spec: &FilterSpec) -> Result<ExistingFilter> {
        self.modify(|store| store.update(account, id, spec))
    }

    fn remove(&self, account: &str, id: &str) -> Result<()> {
        self.modify(|store| store.remove(account, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DEFAULT_FIELD;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileFilterProvider::new(dir.path().join("filters.json"));
        assert!(provider.accounts().unwrap().is_empty());
        assert!(provider.list("acc").unwrap().is_empty());
    }

    #[test]
    fn test_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("filters.json");

        let provider = JsonFileFilterProvider::new(&path);
        provider.add_account("acc").unwrap();
        let created = provider
            .create("acc", &FilterSpec::exclude("f", DEFAULT_FIELD, "a"))
            .unwrap();

        let reopened = JsonFileFilterProvider::new(&path);
        let filters = reopened.list("acc").unwrap();
        assert_eq!(filters, vec![created]);
        assert_eq!(reopened.accounts().unwrap(), vec!["acc"]);
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileFilterProvider::new(dir.path().join("filters.json"));
        provider.add_account("acc").unwrap();

        let before = std::fs::read_to_string(provider.path()).unwrap();
        assert!(provider
            .update("acc", "missing", &FilterSpec::exclude("f", DEFAULT_FIELD, "a"))
            .is_err());
        assert_eq!(std::fs::read_to_string(provider.path()).unwrap(), before);
    }
}
