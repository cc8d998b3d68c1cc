//! Expression segmentation
//!
//! Packs domain names into `|`-joined regular expression alternations that
//! each stay strictly below a maximum length. Packing is greedy over the
//! sorted, deduplicated input, so the same list always yields the same
//! segments.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Bucket for names that do not start with an ASCII letter or digit
pub const OTHER_SHARD: &str = "Other";

/// Separator between alternatives in an expression
pub const SEPARATOR: char = '|';

/// Check a name before it is packed
fn validate(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidDomainName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Pack `names` into expressions shorter than `max_length`.
///
/// Names are escaped individually. Fails if a name is blank or if a single
/// escaped name could never fit into a segment.
pub fn generate<S: AsRef<str>>(names: &[S], max_length: usize) -> Result<Vec<String>> {
    let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    for name in &sorted {
        validate(name)?;
    }
    sorted.sort_unstable();
    sorted.dedup();

    let mut segments = Vec::new();
    let mut current = String::new();

    for name in sorted {
        let escaped = regex::escape(name);
        if escaped.len() >= max_length {
            return Err(Error::SegmentOverflow {
                domain: name.to_string(),
                max_length,
            });
        }

        // keep every segment strictly below the limit
        if !current.is_empty() && current.len() + 1 + escaped.len() >= max_length {
            segments.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(SEPARATOR);
        }
        current.push_str(&escaped);
    }

    if !current.is_empty() {
        segments.push(current);
    }

    debug!(segments = segments.len(), max_length, "Packed domain names");
    Ok(segments)
}

/// Shard key of a name: its uppercased leading ASCII letter or digit, or
/// [`OTHER_SHARD`] for anything else.
pub fn shard_key(name: &str) -> String {
    match name.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase().to_string(),
        _ => OTHER_SHARD.to_string(),
    }
}

/// Group names by shard key; shards come out in key order.
pub fn shard<S: AsRef<str>>(names: &[S]) -> BTreeMap<String, Vec<&str>> {
    let mut shards: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for name in names {
        let name = name.as_ref();
        shards.entry(shard_key(name)).or_default().push(name);
    }
    shards
}

/// Pack every shard independently.
pub fn generate_sharded<S: AsRef<str>>(
    names: &[S],
    max_length: usize,
) -> Result<Vec<(String, Vec<String>)>> {
    for name in names {
        validate(name.as_ref())?;
    }

    shard(names)
        .into_iter()
        .map(|(key, members)| Ok((key, generate(&members, max_length)?)))
        .collect()
}
