//! Per-plugin results of a download loop.

use std::fmt;
use std::path::PathBuf;

use crate::auth::AuthOutcome;

/// Why a plugin was left alone this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No persisted state.
    Untracked,
    /// Tracked but nothing approved yet.
    NoApproval,
    /// The approved version is already installed.
    UpToDate,
}

/// Why an attempt did not produce an artifact. None of these abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Staging was still empty after the wait window.
    NothingDownloaded,
    /// Only an in-progress download was present.
    StillDownloading(PathBuf),
    /// Several finished files; none can be attributed to this attempt.
    Ambiguous(usize),
    /// The previous artifact could not be removed.
    Cleanup(String),
    /// The staged file could not be turned into the jar.
    Materialize(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::NothingDownloaded => write!(f, "nothing was downloaded"),
            Failure::StillDownloading(path) => {
                write!(f, "download still in progress ({})", path.display())
            }
            Failure::Ambiguous(n) => write!(f, "{n} files in staging, cannot tell which is ours"),
            Failure::Cleanup(e) => write!(f, "could not remove previous jar: {e}"),
            Failure::Materialize(e) => write!(f, "could not install download: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Committed {
        version: String,
        path: PathBuf,
        /// None when the installed file could not be hashed.
        sha256: Option<String>,
    },
    Skipped(SkipReason),
    Failed { version: String, failure: Failure },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginReport {
    pub name: String,
    pub outcome: Outcome,
}

/// Everything a run did, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// None when no browser session was needed.
    pub auth: Option<AuthOutcome>,
    pub reports: Vec<PluginReport>,
}

impl RunSummary {
    pub fn push(&mut self, name: &str, outcome: Outcome) {
        self.reports.push(PluginReport {
            name: name.to_string(),
            outcome,
        });
    }

    pub fn committed(&self) -> impl Iterator<Item = &PluginReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Committed { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &PluginReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.reports
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }
}
