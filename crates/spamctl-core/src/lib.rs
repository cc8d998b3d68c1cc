//! # spamctl Core
//!
//! Keeps referrer spam filters of analytics accounts in sync with a list of
//! known spam domains.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Domain synchronization** - Merges remote and local lists into a snapshot
//! - **Filter generation** - Packs domains into length-bounded expressions
//! - **Reconciliation** - Classifies existing versus desired filters
//! - **Orchestration** - Applies the classification through a provider
//! - **Status aggregation** - Majority vote over many statuses
//!
//! ## Example
//!
//! ```rust,no_run
//! use spamctl_core::{Config, JsonFileFilterProvider, SpamControl};
//!
//! let config = Config::load("spamctl.toml")?;
//! let provider = JsonFileFilterProvider::new(&config.provider.store);
//! let control = SpamControl::from_config(&config, provider)?;
//!
//! let report = control.update_filters("12345")?;
//! println!("{report}");
//! # Ok::<(), spamctl_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod control;
pub mod error;
pub mod factory;
pub mod filter;
pub mod naming;
pub mod orchestrator;
pub mod provider;
pub mod reconcile;
pub mod review;
pub mod segment;
pub mod snapshot;
pub mod sources;
pub mod status;
pub mod sync;

// Re-exports for convenience
pub use config::Config;
pub use control::{AccountStatus, SpamControl, StateOverview};
pub use error::{Error, Result};
pub use factory::FilterFactory;
pub use filter::{ExistingFilter, FilterSpec};
pub use naming::FilterNamer;
pub use orchestrator::ApplyReport;
pub use provider::{FilterProvider, JsonFileFilterProvider, MemoryFilterProvider};
pub use reconcile::FilterStatus;
pub use review::{EditorReviewer, Reviewer};
pub use sources::DomainSource;
pub use status::{global_status, Status};
pub use sync::{DomainRepository, SyncReport, UpdateResult};
