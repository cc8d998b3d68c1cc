//! Reconciliation of existing and desired filters
//!
//! Filters are joined by name. Every distinct name gets one [`FilterStatus`]
//! that tells the orchestrator what to do with it. Further installed filters
//! carrying an already seen name are obsolete.

use crate::filter::{ExistingFilter, FilterSpec};
use crate::status::Status;
use serde::Serialize;
use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;
use tracing::{debug, warn};

/// Classification of one filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterStatus {
    /// Content to act on: desired content, or the existing content for
    /// obsolete filters
    pub spec: FilterSpec,
    /// Remote identifier when the filter exists remotely
    pub id: Option<String>,
    /// Classification
    pub kind: Status,
}

impl FilterStatus {
    /// Create a status
    pub fn new(spec: FilterSpec, id: Option<String>, kind: Status) -> Self {
        Self { spec, id, kind }
    }

    /// Filter name
    pub fn name(&self) -> &str {
        &self.spec.name
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.spec.name, self.kind)
    }
}

/// Classify every filter name found in `existing` or `desired`.
///
/// `existing` must already be restricted to managed filters. The result is
/// sorted by name.
pub fn reconcile(existing: &[ExistingFilter], desired: &[FilterSpec]) -> Vec<FilterStatus> {
    let mut installed: BTreeMap<&str, &ExistingFilter> = BTreeMap::new();
    let mut duplicates = Vec::new();
    for filter in existing {
        match installed.entry(filter.name()) {
            Entry::Vacant(slot) => {
                slot.insert(filter);
            }
            Entry::Occupied(_) => {
                warn!(name = filter.name(), id = %filter.id, "Duplicate filter name");
                duplicates.push(filter);
            }
        }
    }

    let mut wanted: BTreeMap<&str, &FilterSpec> = BTreeMap::new();
    for spec in desired {
        wanted.insert(spec.name.as_str(), spec);
    }

    let mut statuses = Vec::with_capacity(installed.len().max(wanted.len()));

    for (name, spec) in &wanted {
        let status = match installed.get(name) {
            Some(current) if current.spec.same_content(spec) => {
                FilterStatus::new((*spec).clone(), Some(current.id.clone()), Status::UpToDate)
            }
            Some(current) => {
                FilterStatus::new((*spec).clone(), Some(current.id.clone()), Status::Outdated)
            }
            None => FilterStatus::new((*spec).clone(), None, Status::NotInstalled),
        };
        statuses.push(status);
    }

    for (name, current) in &installed {
        if !wanted.contains_key(name) {
            statuses.push(FilterStatus::new(
                current.spec.clone(),
                Some(current.id.clone()),
                Status::Obsolete,
            ));
        }
    }

    for current in duplicates {
        statuses.push(FilterStatus::new(
            current.spec.clone(),
            Some(current.id.clone()),
            Status::Obsolete,
        ));
    }

    statuses.sort_by(|a, b| a.spec.name.cmp(&b.spec.name));

    debug!(
        existing = existing.len(),
        desired = desired.len(),
        statuses = statuses.len(),
        "Reconciled filters"
    );
    statuses
}
