//! Filter statuses and their aggregation
//!
//! A single closed [`Status`] enum is used for per-filter classification as
//! well as for account-level and global summaries. Summaries are produced by
//! a majority vote where an exact half never counts as a majority.

use crate::error::Result;
use crate::filter::ExistingFilter;
use crate::reconcile::FilterStatus;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Status of a filter, an account or a set of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Undefined state
    #[default]
    NotSet,
    /// No update is required
    UpToDate,
    /// Installed, but the content differs from the desired content
    Outdated,
    /// Desired, but not installed
    NotInstalled,
    /// Installed, but no longer desired
    Obsolete,
    /// No clear status could be determined
    Unknown,
}

impl Status {
    /// Stable, machine-readable label
    pub fn label(self) -> &'static str {
        match self {
            Status::NotSet => "not-set",
            Status::UpToDate => "up-to-date",
            Status::Outdated => "outdated",
            Status::NotInstalled => "not-installed",
            Status::Obsolete => "obsolete",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Number of equal votes a status needs to be the majority of `n` votes.
///
/// `ceil(n / 2)`, bumped by one for even `n` that the threshold divides, so
/// that an exact half is never enough.
pub fn majority_threshold(n: usize) -> usize {
    let mut threshold = n.div_ceil(2);
    if n % 2 == 0 && threshold > 0 && n % threshold == 0 {
        threshold += 1;
    }
    threshold
}

/// Returns the status that holds the majority, if any.
pub fn majority_status(statuses: &[Status]) -> Option<Status> {
    if statuses.is_empty() {
        return None;
    }

    let mut counts: BTreeMap<Status, usize> = BTreeMap::new();
    for status in statuses {
        *counts.entry(*status).or_default() += 1;
    }

    let threshold = majority_threshold(statuses.len());
    counts
        .into_iter()
        .find(|(_, count)| *count >= threshold)
        .map(|(status, _)| status)
}

/// Reduce many statuses into one.
///
/// Empty input and inputs without a majority yield [`Status::Unknown`].
pub fn global_status(statuses: &[Status]) -> Status {
    let Some(first) = statuses.first() else {
        return Status::Unknown;
    };

    if statuses.iter().all(|s| s == first) {
        return *first;
    }

    let result = majority_status(statuses).unwrap_or(Status::Unknown);
    debug!(votes = statuses.len(), status = %result, "Calculated global status");
    result
}

/// Ratio of up-to-date filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstallationStatus {
    /// Number of filters considered
    pub total: usize,
    /// Number of filters that are up to date
    pub up_to_date: usize,
}

impl InstallationStatus {
    /// Count the up-to-date filters in a reconciliation result
    pub fn from_statuses(statuses: &[FilterStatus]) -> Self {
        Self {
            total: statuses.len(),
            up_to_date: statuses
                .iter()
                .filter(|s| s.kind == Status::UpToDate)
                .count(),
        }
    }

    /// Integer percentage of up-to-date filters, `0` when there are none
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.up_to_date * 100 / self.total
        }
    }
}

impl fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.up_to_date, self.total, self.percent())
    }
}

/// How many known spam domains the installed filters actually match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainCoverage {
    /// Number of known spam domains
    pub total_domains: usize,
    /// Number of known domains matched by at least one filter
    pub domains_covered: usize,
}

impl DomainCoverage {
    /// Match every domain against every filter expression
    pub fn measure(filters: &[ExistingFilter], domains: &[String]) -> Result<Self> {
        let expressions = filters
            .iter()
            .map(|f| {
                RegexBuilder::new(&f.spec.details.expression_value)
                    .case_insensitive(!f.spec.details.case_sensitive)
                    .build()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut covered = BTreeSet::new();
        for domain in domains {
            if expressions.iter().any(|re| re.is_match(domain)) {
                covered.insert(domain.as_str());
            }
        }

        Ok(Self {
            total_domains: domains.len(),
            domains_covered: covered.len(),
        })
    }

    /// Integer percentage of covered domains, `0` when there are none
    pub fn percent(&self) -> usize {
        if self.total_domains == 0 {
            0
        } else {
            self.domains_covered * 100 / self.total_domains
        }
    }
}

impl fmt::Display for DomainCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}%)",
            self.domains_covered,
            self.total_domains,
            self.percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSpec;

    #[test]
    fn test_majority_threshold_table() {
        let expected = [
            (1, 1),
            (2, 2),
            (3, 2),
            (4, 3),
            (5, 3),
            (6, 4),
            (7, 4),
            (8, 5),
            (9, 5),
            (10, 6),
            (11, 6),
            (12, 7),
            (13, 7),
        ];
        for (n, threshold) in expected {
            assert_eq!(majority_threshold(n), threshold, "n = {n}");
        }
    }

    #[test]
    fn test_all_identical() {
        let statuses = [Status::UpToDate, Status::UpToDate, Status::UpToDate];
        assert_eq!(global_status(&statuses), Status::UpToDate);

        let statuses = [Status::Outdated, Status::Outdated, Status::Outdated];
        assert_eq!(global_status(&statuses), Status::Outdated);
    }

    #[test]
    fn test_three_distinct_is_unknown() {
        let statuses = [Status::Obsolete, Status::NotInstalled, Status::UpToDate];
        assert_eq!(global_status(&statuses), Status::Unknown);
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(global_status(&[]), Status::Unknown);
        assert_eq!(majority_status(&[]), None);
    }

    #[test]
    fn test_majority_wins() {
        let statuses = [
            Status::NotInstalled,
            Status::NotInstalled,
            Status::NotInstalled,
            Status::Obsolete,
            Status::Unknown,
        ];
        assert_eq!(global_status(&statuses), Status::NotInstalled);
    }

    #[test]
    fn test_even_split_is_unknown() {
        let statuses = [Status::UpToDate, Status::Outdated];
        assert_eq!(global_status(&statuses), Status::Unknown);

        let statuses = [
            Status::UpToDate,
            Status::UpToDate,
            Status::Outdated,
            Status::Outdated,
        ];
        assert_eq!(global_status(&statuses), Status::Unknown);
    }

    #[test]
    fn test_installation_percent_truncates() {
        let status = InstallationStatus {
            total: 3,
            up_to_date: 2,
        };
        assert_eq!(status.percent(), 66);
        assert_eq!(status.to_string(), "2/3 (66%)");

        assert_eq!(InstallationStatus::default().percent(), 0);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::NotInstalled.to_string(), "not-installed");
        assert_eq!(Status::UpToDate.label(), "up-to-date");
        assert!(Status::NotSet < Status::Unknown);
    }

    #[test]
    fn test_domain_coverage_counts_each_domain_once() {
        let filters = vec![
            ExistingFilter::new("1", FilterSpec::exclude("a", "CAMPAIGN_SOURCE", r"spam\.com")),
            ExistingFilter::new("2", FilterSpec::exclude("b", "CAMPAIGN_SOURCE", r"spam\.com|other\.net")),
        ];
        let domains = vec![
            "spam.com".to_string(),
            "other.net".to_string(),
            "clean.org".to_string(),
        ];

        let coverage = DomainCoverage::measure(&filters, &domains).unwrap();
        assert_eq!(coverage.total_domains, 3);
        assert_eq!(coverage.domains_covered, 2);
        assert_eq!(coverage.percent(), 66);
    }

    #[test]
    fn test_domain_coverage_honors_case_sensitivity() {
        let insensitive = vec![ExistingFilter::new(
            "1",
            FilterSpec::exclude("a", "CAMPAIGN_SOURCE", r"spam\.com"),
        )];
        let domains = vec!["SPAM.com".to_string()];

        let coverage = DomainCoverage::measure(&insensitive, &domains).unwrap();
        assert_eq!(coverage.domains_covered, 1);

        let mut sensitive = insensitive;
        sensitive[0].spec.details.case_sensitive = true;
        let coverage = DomainCoverage::measure(&sensitive, &domains).unwrap();
        assert_eq!(coverage.domains_covered, 0);
    }
}
