//! Staging directory the browser downloads into.
//!
//! The directory must be empty before each download attempt so that whatever
//! appears afterwards belongs to that attempt.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffixes browsers use for downloads that have not finished yet.
const PARTIAL_SUFFIXES: &[&str] = &[".crdownload", ".part", ".tmp", ".download"];

/// What the staging directory holds after a download wait window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagingPoll {
    /// Nothing arrived.
    Empty,
    /// Only an in-progress download file is present.
    Incomplete(PathBuf),
    /// Exactly one finished file.
    Ready(PathBuf),
    /// More than one finished entry; none of them can be attributed to the attempt.
    Ambiguous(usize),
}

fn is_partial(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    PARTIAL_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// Create `dir` if needed and delete every entry in it (top level only; a
/// subdirectory entry is removed as a whole). Returns how many entries were removed.
pub fn clear(dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("create staging dir {}", dir.display()))?;
    let mut removed = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", path.display()))?;
        let result = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.with_context(|| format!("remove {}", path.display()))?;
        removed += 1;
    }
    if removed > 0 {
        tracing::debug!(dir = %dir.display(), removed, "cleared staging directory");
    }
    Ok(removed)
}

/// Classify the staging directory contents.
pub fn poll(dir: &Path) -> Result<StagingPoll> {
    let mut finished = Vec::new();
    let mut partial = None;
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry.with_context(|| format!("read {}", dir.display()))?.path();
        if is_partial(&path) {
            partial.get_or_insert(path);
        } else {
            finished.push(path);
        }
    }

    Ok(match (finished.len(), partial) {
        (0, None) => StagingPoll::Empty,
        (0, Some(p)) => StagingPoll::Incomplete(p),
        (1, _) => StagingPoll::Ready(finished.remove(0)),
        (n, _) => StagingPoll::Ambiguous(n),
    })
}
