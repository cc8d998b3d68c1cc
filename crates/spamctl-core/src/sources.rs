//! Domain list sources
//!
//! Every source yields a list of domain names. Lines are trimmed and blank
//! lines dropped; no other normalization takes place here.

use crate::error::{Error, Result};
use crate::snapshot::parse_lines;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Public block-lists used when no remote list is configured
pub const DEFAULT_REMOTE_LISTS: &[&str] = &[
    "https://raw.githubusercontent.com/matomo-org/referrer-spam-list/master/spammers.txt",
    "https://raw.githubusercontent.com/ddofborg/analytics-ghost-spam-list/master/adwordsrobot.com-spam-list.txt",
];

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that yields a list of domain names
#[cfg_attr(test, mockall::automock)]
pub trait DomainSource {
    /// Human readable origin, used in logs and errors
    fn name(&self) -> String;

    /// Retrieve the current list
    fn fetch(&self) -> Result<Vec<String>>;
}

/// Plain-text list served over HTTP(S)
#[derive(Debug, Clone)]
pub struct RemoteSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl RemoteSource {
    /// Create a source for `url`
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("spamctl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Requested URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DomainSource for RemoteSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<String>> {
        debug!(url = %self.url, "Downloading domain list");
        let response = self.client.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let domains = parse_lines(&body);
        info!("Downloaded {} domains from {}", domains.len(), self.url);
        Ok(domains)
    }
}

/// Local text file with one domain per line
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DomainSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::source(self.name(), e.to_string()))?;
        Ok(parse_lines(&content))
    }
}

/// Fixed in-memory list
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    domains: Vec<String>,
}

impl StaticSource {
    /// Create a named list
    pub fn new<I, S>(name: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }
}

impl DomainSource for StaticSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self) -> Result<Vec<String>> {
        Ok(parse_lines(&self.domains.join("\n")))
    }
}

/// Merges several sources into one sorted, deduplicated list
///
/// The first failing source aborts the whole fetch.
#[derive(Default)]
pub struct CompositeSource {
    sources: Vec<Box<dyn DomainSource>>,
}

impl CompositeSource {
    /// Create an empty composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source
    pub fn push(&mut self, source: impl DomainSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Builder style [`push`](Self::push)
    pub fn with(mut self, source: impl DomainSource + 'static) -> Self {
        self.push(source);
        self
    }

    /// Number of sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when no source was added
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for CompositeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeSource")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl DomainSource for CompositeSource {
    fn name(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn fetch(&self) -> Result<Vec<String>> {
        let mut merged = BTreeSet::new();
        for source in &self.sources {
            merged.extend(source.fetch()?);
        }
        Ok(merged.into_iter().collect())
    }
}
