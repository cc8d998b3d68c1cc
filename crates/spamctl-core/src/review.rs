//! Interactive review of candidate spam domains
//!
//! Candidates are written to a scratch file, one commented-out line each.
//! Whatever the reviewer uncomments is approved.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

const HEADER: &[&str] = &[
    "# Review referrer domain names.",
    "# Uncomment all lines which you consider to be referrer spam.",
];

/// Decides which candidates are spam
#[cfg_attr(test, mockall::automock)]
pub trait Reviewer {
    /// Return the approved subset of `candidates`, sorted and deduplicated
    fn review(&self, candidates: &[String]) -> Result<Vec<String>>;
}

/// Render the scratch file for `candidates`
pub fn render_review(candidates: &[String], line_ending: &str) -> String {
    let mut content = String::new();
    for line in HEADER {
        content.push_str(line);
        content.push_str(line_ending);
    }
    content.push_str(line_ending);

    let unique: BTreeSet<&str> = candidates
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    for candidate in unique {
        content.push('#');
        content.push_str(candidate);
        content.push_str(line_ending);
    }
    content
}

/// Collect the uncommented, non-blank lines of a reviewed file
pub fn parse_review(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Opens the candidates in a text editor
#[derive(Debug, Clone)]
pub struct EditorReviewer {
    editor: String,
    scratch_dir: PathBuf,
}

impl EditorReviewer {
    /// Use `editor`, which may carry arguments (`"code --wait"`)
    pub fn new(editor: impl Into<String>) -> Self {
        Self {
            editor: editor.into(),
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Place scratch files in `dir` instead of the system temp directory
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Fresh file with an unpredictable name, removed again on drop
    fn scratch_file(&self, content: &str) -> Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("spamctl-review-")
            .suffix(".txt")
            .tempfile_in(&self.scratch_dir)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    fn edit(&self, path: &Path) -> Result<()> {
        let mut parts = self.editor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Review("no editor configured".to_string()))?;

        debug!(editor = %self.editor, path = %path.display(), "Opening editor");
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|e| Error::Review(format!("failed to start {program:?}: {e}")))?;

        if !status.success() {
            return Err(Error::Review(format!(
                "editor {program:?} finished with {status}"
            )));
        }
        Ok(())
    }
}

impl Reviewer for EditorReviewer {
    fn review(&self, candidates: &[String]) -> Result<Vec<String>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let scratch = self.scratch_file(&render_review(candidates, "\n"))?;
        self.edit(scratch.path())?;
        let approved = parse_review(&std::fs::read_to_string(scratch.path())?);
        drop(scratch);

        info!(
            candidates = candidates.len(),
            approved = approved.len(),
            "Review finished"
        );
        Ok(approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_comments_out_every_candidate() {
        let content = render_review(&strings(&["b.com", "a.com", "b.com", " "]), "\n");
        let lines: Vec<_> = content.lines().collect();

        assert!(lines[0].starts_with('#'));
        assert_eq!(&lines[lines.len() - 2..], &["#a.com", "#b.com"]);
        assert!(parse_review(&content).is_empty());
    }

    #[test]
    fn test_parse_review() {
        let content = "# header\n\n#skipped.com\n  spam.com \nother.com\nspam.com\n";
        assert_eq!(parse_review(content), strings(&["other.com", "spam.com"]));
    }

    #[test]
    fn test_no_candidates_skips_editor() {
        let reviewer = EditorReviewer::new("definitely-not-an-editor-binary");
        assert!(reviewer.review(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_editor_fails() {
        let dir = tempfile::tempdir().unwrap();
        let reviewer =
            EditorReviewer::new("definitely-not-an-editor-binary").with_scratch_dir(dir.path());

        assert!(matches!(
            reviewer.review(&strings(&["a.com"])),
            Err(Error::Review(_))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_uncomments_lines() {
        let dir = tempfile::tempdir().unwrap();
        let reviewer = EditorReviewer::new("sed -i -e s/^#spam/spam/").with_scratch_dir(dir.path());

        let approved = reviewer
            .review(&strings(&["spam1.com", "ham.com", "spam2.com"]))
            .unwrap();
        assert_eq!(approved, strings(&["spam1.com", "spam2.com"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_untouched_file_approves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let reviewer = EditorReviewer::new("true").with_scratch_dir(dir.path());
        assert!(reviewer.review(&strings(&["a.com"])).unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_planted_symlink_is_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let victim = dir.path().join("victim.txt");
        std::fs::write(&victim, "precious\n").unwrap();
        for name in [
            format!("spamctl-review-{}.txt", std::process::id()),
            "spamctl-review-.txt".to_string(),
        ] {
            std::os::unix::fs::symlink(&victim, dir.path().join(name)).unwrap();
        }

        let reviewer = EditorReviewer::new("true").with_scratch_dir(dir.path());
        assert!(reviewer.review(&strings(&["a.com"])).unwrap().is_empty());

        assert_eq!(std::fs::read_to_string(&victim).unwrap(), "precious\n");
        // victim plus the two links; the scratch file is gone
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }
}
