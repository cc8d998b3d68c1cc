//! High level spam control operations
//!
//! [`SpamControl`] wires domain repositories, filter generation,
//! reconciliation and the orchestrator together for one filter provider.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::factory::FilterFactory;
use crate::filter::ExistingFilter;
use crate::orchestrator::{self, ApplyReport};
use crate::provider::{self, FilterProvider};
use crate::reconcile::{self, FilterStatus};
use crate::review::Reviewer;
use crate::snapshot;
use crate::sources::{CompositeSource, FileSource, RemoteSource, StaticSource};
use crate::status::{global_status, DomainCoverage, InstallationStatus, Status};
use crate::sync::{DomainRepository, UpdateResult};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Spam control state of one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountStatus {
    /// Account identifier
    pub account: String,
    /// Summary of all filter statuses
    pub status: Status,
    /// Filter counters
    pub installation: InstallationStatus,
    /// Share of known domains blocked by the installed filters
    pub coverage: DomainCoverage,
}

/// State of all accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateOverview {
    /// Summary of all account statuses
    pub status: Status,
    /// Number of known spam domains
    pub known_domains: usize,
    /// Per account state
    pub accounts: Vec<AccountStatus>,
}

/// Manages referrer spam filters of the accounts of one provider
#[derive(Debug)]
pub struct SpamControl<P> {
    provider: P,
    factory: FilterFactory,
    community: DomainRepository,
    private: DomainRepository,
    accounts: Vec<String>,
}

impl<P: FilterProvider> SpamControl<P> {
    /// Create a controller
    pub fn new(
        provider: P,
        factory: FilterFactory,
        community: DomainRepository,
        private: DomainRepository,
    ) -> Self {
        Self {
            provider,
            factory,
            community,
            private,
            accounts: Vec::new(),
        }
    }

    /// Build a controller from configuration
    pub fn from_config(config: &Config, provider: P) -> Result<Self> {
        let mut sources = CompositeSource::new();
        for url in &config.domains.remote {
            sources.push(RemoteSource::new(url.as_str())?);
        }
        for path in &config.domains.files {
            sources.push(FileSource::new(path));
        }
        debug!(sources = sources.len(), "Configured domain sources");

        let line_ending = config.domains.line_ending;
        let community = DomainRepository::new(&config.domains.snapshot, sources, line_ending);
        let empty: [&str; 0] = [];
        let private = DomainRepository::new(
            &config.domains.private_snapshot,
            StaticSource::new("reviewed domains", empty),
            line_ending,
        );

        Ok(Self::new(
            provider,
            FilterFactory::from_config(&config.filters),
            community,
            private,
        )
        .with_accounts(config.general.accounts.clone()))
    }

    /// Restrict overviews to these accounts; empty means all
    pub fn with_accounts(mut self, accounts: Vec<String>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Accounts included in the overview
    pub fn accounts(&self) -> Result<Vec<String>> {
        if self.accounts.is_empty() {
            self.provider.accounts()
        } else {
            Ok(self.accounts.clone())
        }
    }

    fn ensure_account(&self, account: &str) -> Result<()> {
        if self.provider.accounts()?.iter().any(|a| a == account) {
            Ok(())
        } else {
            Err(Error::AccountNotFound {
                account: account.to_string(),
            })
        }
    }

    /// Community and reviewed domains, sorted and deduplicated
    pub fn known_domains(&self) -> Result<Vec<String>> {
        let mut domains: BTreeSet<String> = self.community.domains()?.into_iter().collect();

        match snapshot::read_snapshot(self.private.path()) {
            Ok(private) => domains.extend(private),
            Err(Error::SnapshotNotFound { .. }) | Err(Error::NoDomains { .. }) => {}
            Err(e) => return Err(e),
        }

        Ok(domains.into_iter().collect())
    }

    /// Refresh the community snapshot
    pub fn update_domains(&self) -> Result<UpdateResult> {
        let report = self.community.update()?;
        UpdateResult::from_report(&report)
    }

    /// Classify every managed filter of `account` against the known domains
    pub fn filter_statuses(&self, account: &str) -> Result<Vec<FilterStatus>> {
        let domains = self.known_domains()?;
        let (_, statuses) = self.inspect(account, &domains)?;
        Ok(statuses)
    }

    /// Managed filters of `account` and their statuses against `domains`
    fn inspect(
        &self,
        account: &str,
        domains: &[String],
    ) -> Result<(Vec<ExistingFilter>, Vec<FilterStatus>)> {
        self.ensure_account(account)?;
        let desired = self.factory.new_filters(domains)?;
        let existing = provider::list_managed(&self.provider, self.factory.namer(), account)?;
        let statuses = reconcile::reconcile(&existing, &desired);
        Ok((existing, statuses))
    }

    /// Report what [`update_filters`](Self::update_filters) would do
    pub fn plan_update(&self, account: &str) -> Result<ApplyReport> {
        orchestrator::plan(&self.filter_statuses(account)?)
    }

    /// Bring the filters of `account` in line with the known domains
    pub fn update_filters(&self, account: &str) -> Result<ApplyReport> {
        let statuses = self.filter_statuses(account)?;
        orchestrator::apply(&self.provider, account, &statuses)
    }

    /// Remove every managed filter of `account` and return how many were removed
    pub fn remove_filters(&self, account: &str) -> Result<usize> {
        self.ensure_account(account)?;
        let managed = provider::list_managed(&self.provider, self.factory.namer(), account)?;
        for filter in &managed {
            self.provider.remove(account, &filter.id)?;
        }
        info!(account, removed = managed.len(), "Removed managed filters");
        Ok(managed.len())
    }

    /// Current state of `account`
    pub fn account_status(&self, account: &str) -> Result<AccountStatus> {
        Ok(self.account_report(account)?.0)
    }

    /// Current state of `account` together with the status of each filter
    ///
    /// Lists the filters and the known domains once for both results.
    pub fn account_report(&self, account: &str) -> Result<(AccountStatus, Vec<FilterStatus>)> {
        let domains = self.known_domains()?;
        let (installed, statuses) = self.inspect(account, &domains)?;
        let status = summarize(account, &installed, &statuses, &domains)?;
        Ok((status, statuses))
    }

    /// State of every account in [`accounts`](Self::accounts)
    pub fn overview(&self) -> Result<StateOverview> {
        let domains = self.known_domains()?;

        let accounts = self
            .accounts()?
            .iter()
            .map(|account| {
                let (installed, statuses) = self.inspect(account, &domains)?;
                summarize(account, &installed, &statuses, &domains)
            })
            .collect::<Result<Vec<_>>>()?;

        let kinds: Vec<Status> = accounts.iter().map(|a| a.status).collect();
        Ok(StateOverview {
            status: global_status(&kinds),
            known_domains: domains.len(),
            accounts,
        })
    }

    /// Let `reviewer` pick spam among `candidates` and store the approved
    /// ones in the private list.
    ///
    /// Candidates that are already known are not offered again. Returns the
    /// newly stored names.
    pub fn review_domains<R: Reviewer + ?Sized>(
        &self,
        reviewer: &R,
        candidates: &[String],
    ) -> Result<Vec<String>> {
        let known: BTreeSet<String> = self.known_domains()?.into_iter().collect();
        let fresh: Vec<String> = candidates
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && !known.contains(c))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if fresh.is_empty() {
            info!("No new candidates to review");
            return Ok(Vec::new());
        }

        let approved = reviewer.review(&fresh)?;
        self.private.add_domains(&approved)
    }
}

fn summarize(
    account: &str,
    installed: &[ExistingFilter],
    statuses: &[FilterStatus],
    domains: &[String],
) -> Result<AccountStatus> {
    let kinds: Vec<Status> = statuses.iter().map(|s| s.kind).collect();
    Ok(AccountStatus {
        account: account.to_string(),
        status: global_status(&kinds),
        installation: InstallationStatus::from_statuses(statuses),
        coverage: DomainCoverage::measure(installed, domains)?,
    })
}
