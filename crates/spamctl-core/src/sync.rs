//! Domain list synchronization
//!
//! A [`DomainRepository`] owns one snapshot file. Updating it pulls the
//! current list from its source, diffs that against the stored snapshot and
//! replaces the file wholesale.

use crate::error::{Error, Result};
use crate::snapshot::{self, LineEnding};
use crate::sources::DomainSource;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of one synchronization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Names present before and after
    pub unchanged: Vec<String>,
    /// Names only present after
    pub added: Vec<String>,
    /// Names only present before
    pub removed: Vec<String>,
    /// Sorted, deduplicated new list
    pub snapshot: Vec<String>,
}

impl SyncReport {
    /// Diff a previous list against a new one.
    ///
    /// Both lists are deduplicated; every output list is sorted.
    pub fn compute(previous: &[String], current: &[String]) -> Self {
        let old: BTreeSet<&str> = previous.iter().map(String::as_str).collect();
        let new: BTreeSet<&str> = current.iter().map(String::as_str).collect();

        let owned = |set: BTreeSet<&&str>| -> Vec<String> {
            set.into_iter().map(|s| s.to_string()).collect()
        };

        Self {
            unchanged: owned(old.intersection(&new).collect()),
            added: owned(new.difference(&old).collect()),
            removed: owned(old.difference(&new).collect()),
            snapshot: new.into_iter().map(str::to_string).collect(),
        }
    }

    /// True when nothing was added or removed
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Fetch `source` and diff it against `previous`.
///
/// Nothing is persisted here. Use a [`CompositeSource`](crate::sources::CompositeSource)
/// to merge several lists.
pub fn sync<S: DomainSource + ?Sized>(previous: &[String], source: &S) -> Result<SyncReport> {
    let current = source.fetch()?;
    let report = SyncReport::compute(previous, &current);
    debug!(
        source = %source.name(),
        unchanged = report.unchanged.len(),
        added = report.added.len(),
        removed = report.removed.len(),
        "Synchronized domain list"
    );
    Ok(report)
}

/// Kind of change of one domain in an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Kept
    Unchanged,
    /// New in this update
    Added,
    /// Dropped by this update
    Removed,
}

impl ChangeType {
    /// One-character marker for listings
    pub fn symbol(self) -> &'static str {
        match self {
            ChangeType::Unchanged => " ",
            ChangeType::Added => "+",
            ChangeType::Removed => "-",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One domain and what happened to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainChange {
    /// Change kind
    pub change: ChangeType,
    /// Domain name
    pub domain: String,
}

/// Counters of an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateStatistics {
    /// Kept domains
    pub unchanged: usize,
    /// New domains
    pub added: usize,
    /// Dropped domains
    pub removed: usize,
    /// Sum of all of the above
    pub total: usize,
}

/// Presentation model of a domain list update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    /// Counters
    pub statistics: UpdateStatistics,
    /// All domains sorted by name
    pub domains: Vec<DomainChange>,
}

impl UpdateResult {
    /// Merge the lists of a report into one name-sorted list.
    ///
    /// Fails with [`Error::NoDomainsReceived`] when the report is empty.
    pub fn from_report(report: &SyncReport) -> Result<Self> {
        let tagged = |change: ChangeType, names: &[String]| {
            names
                .iter()
                .map(move |domain| DomainChange {
                    change,
                    domain: domain.clone(),
                })
                .collect::<Vec<_>>()
        };

        let mut domains = tagged(ChangeType::Unchanged, &report.unchanged);
        domains.extend(tagged(ChangeType::Added, &report.added));
        domains.extend(tagged(ChangeType::Removed, &report.removed));

        if domains.is_empty() {
            return Err(Error::NoDomainsReceived);
        }

        domains.sort_by(|a, b| a.domain.cmp(&b.domain).then(a.change.cmp(&b.change)));

        Ok(Self {
            statistics: UpdateStatistics {
                unchanged: report.unchanged.len(),
                added: report.added.len(),
                removed: report.removed.len(),
                total: domains.len(),
            },
            domains,
        })
    }

    /// Entries that were added or removed
    pub fn changes(&self) -> impl Iterator<Item = &DomainChange> {
        self.domains
            .iter()
            .filter(|d| d.change != ChangeType::Unchanged)
    }
}

/// Snapshot file plus the source that refreshes it
pub struct DomainRepository {
    path: PathBuf,
    source: Box<dyn DomainSource>,
    line_ending: LineEnding,
}

impl fmt::Debug for DomainRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainRepository")
            .field("path", &self.path)
            .field("source", &self.source.name())
            .field("line_ending", &self.line_ending)
            .finish()
    }
}

impl DomainRepository {
    /// Create a repository for the snapshot at `path`
    pub fn new(
        path: impl Into<PathBuf>,
        source: impl DomainSource + 'static,
        line_ending: LineEnding,
    ) -> Self {
        Self {
            path: path.into(),
            source: Box::new(source),
            line_ending,
        }
    }

    /// Snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored domains.
    ///
    /// Runs a first synchronization when there is no usable snapshot yet.
    pub fn domains(&self) -> Result<Vec<String>> {
        match snapshot::read_snapshot(&self.path) {
            Ok(domains) => Ok(domains),
            Err(Error::SnapshotNotFound { .. }) | Err(Error::NoDomains { .. }) => {
                info!(path = %self.path.display(), "No domain snapshot yet, synchronizing");
                Ok(self.update()?.snapshot)
            }
            Err(e) => Err(e),
        }
    }

    /// Refresh the snapshot from the source.
    ///
    /// A failing source or an empty result leaves the snapshot untouched.
    pub fn update(&self) -> Result<SyncReport> {
        let previous = match snapshot::read_snapshot(&self.path) {
            Ok(domains) => domains,
            Err(e) => {
                debug!(error = %e, "Treating domain snapshot as empty");
                Vec::new()
            }
        };

        let report = sync(&previous, self.source.as_ref())?;
        if report.snapshot.is_empty() {
            warn!(source = %self.source.name(), "Source returned no domains, keeping snapshot");
            return Err(Error::NoDomainsReceived);
        }

        snapshot::write_snapshot(&self.path, &report.snapshot, self.line_ending)?;
        info!(
            added = report.added.len(),
            removed = report.removed.len(),
            total = report.snapshot.len(),
            "Updated domain snapshot"
        );
        Ok(report)
    }

    /// Merge `names` into the snapshot and return the ones that were new.
    ///
    /// Names are trimmed; blank names are ignored.
    pub fn add_domains<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        let existing = match snapshot::read_snapshot(&self.path) {
            Ok(domains) => domains,
            Err(Error::SnapshotNotFound { .. }) | Err(Error::NoDomains { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };

        let candidates: Vec<String> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();

        let mut merged = existing.clone();
        merged.extend(candidates);
        let report = SyncReport::compute(&existing, &merged);

        if report.added.is_empty() {
            debug!(path = %self.path.display(), "No new domains to add");
            return Ok(Vec::new());
        }

        snapshot::write_snapshot(&self.path, &report.snapshot, self.line_ending)?;
        info!(
            added = report.added.len(),
            total = report.snapshot.len(),
            "Added domains to {}",
            self.path.display()
        );
        Ok(report.added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{MockDomainSource, StaticSource};

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compute_diff() {
        let report = SyncReport::compute(&strings(&["a", "b", "c"]), &strings(&["d", "b", "c", "b"]));

        assert_eq!(report.unchanged, strings(&["b", "c"]));
        assert_eq!(report.added, strings(&["d"]));
        assert_eq!(report.removed, strings(&["a"]));
        assert_eq!(report.snapshot, strings(&["b", "c", "d"]));
        assert!(!report.is_unchanged());
    }

    #[test]
    fn test_sync_without_previous() {
        let source = StaticSource::new("static", ["b.com", "a.com"]);
        let report = sync(&[], &source).unwrap();

        assert_eq!(report.added, strings(&["a.com", "b.com"]));
        assert!(report.removed.is_empty());
        assert!(report.unchanged.is_empty());
    }

    #[test]
    fn test_update_result_sorted_by_name() {
        let report = SyncReport {
            unchanged: strings(&["b"]),
            added: strings(&["c"]),
            removed: strings(&["a"]),
            snapshot: strings(&["b", "c"]),
        };

        let result = UpdateResult::from_report(&report).unwrap();
        let listed: Vec<_> = result
            .domains
            .iter()
            .map(|d| (d.change, d.domain.as_str()))
            .collect();
        assert_eq!(
            listed,
            vec![
                (ChangeType::Removed, "a"),
                (ChangeType::Unchanged, "b"),
                (ChangeType::Added, "c"),
            ]
        );
        assert_eq!(result.statistics.total, 3);
        assert_eq!(result.changes().count(), 2);
    }

    #[test]
    fn test_empty_update_result() {
        assert!(matches!(
            UpdateResult::from_report(&SyncReport::default()),
            Err(Error::NoDomainsReceived)
        ));
    }

    #[test]
    fn test_repository_first_read_synchronizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains");
        let repo = DomainRepository::new(&path, StaticSource::new("s", ["b", "a"]), LineEnding::Lf);

        assert_eq!(repo.domains().unwrap(), strings(&["a", "b"]));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_repository_failed_source_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains");
        std::fs::write(&path, "old.com\n").unwrap();

        let mut source = MockDomainSource::new();
        source
            .expect_fetch()
            .returning(|| Err(Error::source("remote", "timeout")));
        source.expect_name().return_const("remote".to_string());

        let repo = DomainRepository::new(&path, source, LineEnding::Lf);
        assert!(repo.update().is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old.com\n");
    }

    #[test]
    fn test_repository_empty_source_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains");
        std::fs::write(&path, "old.com\n").unwrap();

        let empty: [&str; 0] = [];
        let repo = DomainRepository::new(&path, StaticSource::new("s", empty), LineEnding::Lf);
        assert!(matches!(repo.update(), Err(Error::NoDomainsReceived)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old.com\n");
    }

    #[test]
    fn test_add_domains_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("private");
        let empty: [&str; 0] = [];
        let repo = DomainRepository::new(&path, StaticSource::new("s", empty), LineEnding::Lf);

        assert_eq!(repo.add_domains(&["b.com", " a.com ", ""]).unwrap(), strings(&["a.com", "b.com"]));
        assert_eq!(repo.add_domains(&["a.com", "c.com"]).unwrap(), strings(&["c.com"]));
        assert!(repo.add_domains(&["c.com"]).unwrap().is_empty());
        assert_eq!(
            snapshot::read_snapshot(&path).unwrap(),
            strings(&["a.com", "b.com", "c.com"])
        );
    }
}
