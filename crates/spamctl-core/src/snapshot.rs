//! Domain snapshot persistence
//!
//! File format:
//! - One domain name per line
//! - No header, no comments
//! - Surrounding whitespace and blank lines are ignored when reading

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Line terminator used when writing snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    /// Terminator characters
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Terminator of the platform we were built for
    pub fn native() -> Self {
        if cfg!(windows) {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }
}

/// Split text into trimmed, non-blank lines
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a snapshot.
///
/// Fails if the file is missing, unreadable, or has no non-blank line.
pub fn read_snapshot(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::SnapshotNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;

    let domains = parse_lines(&content);
    if domains.is_empty() {
        return Err(Error::NoDomains {
            path: path.display().to_string(),
        });
    }

    debug!(count = domains.len(), path = %path.display(), "Read domain snapshot");
    Ok(domains)
}

/// Replace a snapshot with `domains`, creating parent directories as needed.
pub fn write_snapshot<S: AsRef<str>>(
    path: &Path,
    domains: &[S],
    line_ending: LineEnding,
) -> Result<()> {
    let mut content = String::new();
    for domain in domains {
        content.push_str(domain.as_ref());
        content.push_str(line_ending.as_str());
    }

    replace_file(path, content.as_bytes())?;
    info!("Saved {} domains to {}", domains.len(), path.display());
    Ok(())
}

/// Write `content` next to `path` and rename it into place.
///
/// Readers see either the old or the new file, never a partial one.
pub fn replace_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    std::fs::rename(&temp_path, path)?;
    Ok(())
}
