//! Execution of reconciliation results
//!
//! Maps every [`FilterStatus`] to at most one provider call. Calls are issued
//! in the order of the statuses; the first failure aborts and nothing is
//! rolled back.

use crate::error::{Error, Result};
use crate::filter::FilterSpec;
use crate::provider::FilterProvider;
use crate::reconcile::FilterStatus;
use crate::status::Status;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument};

/// Provider operation implied by a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// Nothing to do
    Keep,
    /// Create the filter
    Create(&'a FilterSpec),
    /// Replace the content of the filter with the given id
    Update(&'a str, &'a FilterSpec),
    /// Delete the filter with the given id
    Remove(&'a str),
}

impl<'a> Action<'a> {
    /// Decide what to do with `status`
    pub fn for_status(status: &'a FilterStatus) -> Result<Self> {
        let unexpected = || Error::UnexpectedStatus {
            filter: status.spec.name.clone(),
            status: status.kind,
        };

        match (status.kind, status.id.as_deref()) {
            (Status::UpToDate, _) => Ok(Action::Keep),
            (Status::NotInstalled, _) => Ok(Action::Create(&status.spec)),
            (Status::Outdated, Some(id)) => Ok(Action::Update(id, &status.spec)),
            (Status::Obsolete, Some(id)) => Ok(Action::Remove(id)),
            _ => Err(unexpected()),
        }
    }
}

/// Counts of the operations of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Filters left alone
    pub unchanged: usize,
    /// Filters created
    pub created: usize,
    /// Filters updated
    pub updated: usize,
    /// Filters removed
    pub removed: usize,
}

impl ApplyReport {
    /// Number of mutating provider calls
    pub fn mutations(&self) -> usize {
        self.created + self.updated + self.removed
    }

    fn record(&mut self, action: &Action<'_>) {
        match action {
            Action::Keep => self.unchanged += 1,
            Action::Create(_) => self.created += 1,
            Action::Update(..) => self.updated += 1,
            Action::Remove(_) => self.removed += 1,
        }
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created: {}, updated: {}, removed: {}, unchanged: {}",
            self.created, self.updated, self.removed, self.unchanged
        )
    }
}

/// Compute the report `apply` would produce without calling the provider
pub fn plan(statuses: &[FilterStatus]) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();
    for status in statuses {
        report.record(&Action::for_status(status)?);
    }
    Ok(report)
}

/// Execute the operations implied by `statuses` against `account`.
#[instrument(skip(provider, statuses), fields(filters = statuses.len()))]
pub fn apply<P: FilterProvider + ?Sized>(
    provider: &P,
    account: &str,
    statuses: &[FilterStatus],
) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    for status in statuses {
        let action = Action::for_status(status)?;
        match action {
            Action::Keep => {}
            Action::Create(spec) => {
                let created = provider.create(account, spec)?;
                debug!(id = %created.id, filter = %spec.name, "Created filter");
            }
            Action::Update(id, spec) => {
                provider.update(account, id, spec)?;
                debug!(id, filter = %spec.name, "Updated filter");
            }
            Action::Remove(id) => {
                provider.remove(account, id)?;
                debug!(id, filter = %status.spec.name, "Removed filter");
            }
        }
        report.record(&action);
    }

    info!(
        account,
        created = report.created,
        updated = report.updated,
        removed = report.removed,
        unchanged = report.unchanged,
        "Applied filter changes"
    );
    Ok(report)
}
