//! One download attempt for one plugin.
//!
//! Start → (destination cleared, staging cleared) → Navigated → Waited →
//! Polled → Materialized → Committed. Every step short of Committed can end
//! the attempt as [`Outcome::Failed`]; only staging and state-store errors
//! escape as [`RunError`].

use std::fs;
use std::io;
use std::path::Path;
use tokio::time::sleep;

use super::summary::{Failure, Outcome, SkipReason};
use crate::browser::Browser;
use crate::checksum::sha256_path;
use crate::config::PluginSpec;
use crate::context::RunContext;
use crate::error::RunError;
use crate::materialize::{self, Method};
use crate::staging::{self, StagingPoll};

fn remove_stale(dest: &Path) -> io::Result<bool> {
    match fs::remove_file(dest) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn failed(version: String, failure: Failure) -> Outcome {
    Outcome::Failed { version, failure }
}

pub(super) async fn attempt<B: Browser + ?Sized>(
    browser: &mut B,
    ctx: &RunContext,
    spec: &PluginSpec,
) -> Result<Outcome, RunError> {
    sleep(ctx.config.navigation_delay()).await;

    // State may have changed since the pending set was resolved.
    let state = ctx.db.find(&spec.name).await.map_err(RunError::State)?;
    let version = match &state {
        None => return Ok(Outcome::Skipped(SkipReason::Untracked)),
        Some(s) => match s.pending_version() {
            Some(v) => v.to_string(),
            None if s.approved.is_none() => return Ok(Outcome::Skipped(SkipReason::NoApproval)),
            None => return Ok(Outcome::Skipped(SkipReason::UpToDate)),
        },
    };

    let dest = ctx.paths.plugins_dir.join(&spec.jar);
    match remove_stale(&dest) {
        Ok(true) => tracing::debug!(plugin = %spec.name, "removed previous {}", dest.display()),
        Ok(false) => {}
        Err(e) => return Ok(failed(version, Failure::Cleanup(e.to_string()))),
    }
    staging::clear(&ctx.paths.staging_dir).map_err(RunError::Staging)?;

    tracing::info!(
        plugin = %spec.name,
        version = %version,
        "downloading {} ({}): plugins/{}",
        spec.name,
        spec.resource,
        spec.jar
    );
    let url = ctx.site.download_url(&spec.resource, &version);
    // The download response aborts the page load, so an error here says nothing.
    let _ = browser.navigate(url.as_str()).await;
    sleep(ctx.config.download_time()).await;

    let staged = match staging::poll(&ctx.paths.staging_dir).map_err(RunError::Staging)? {
        StagingPoll::Ready(path) => path,
        StagingPoll::Empty => return Ok(failed(version, Failure::NothingDownloaded)),
        StagingPoll::Incomplete(path) => {
            return Ok(failed(version, Failure::StillDownloading(path)))
        }
        StagingPoll::Ambiguous(n) => return Ok(failed(version, Failure::Ambiguous(n))),
    };

    let artifact = match materialize::materialize(&staged, spec, &ctx.paths.plugins_dir) {
        Ok(artifact) => artifact,
        Err(e) => return Ok(failed(version, Failure::Materialize(e.to_string()))),
    };
    if let Method::Extracted { entry } = &artifact.method {
        tracing::info!(plugin = %spec.name, "extracted {} from archive", entry);
    }

    ctx.db
        .set_downloaded(&spec.name, &version)
        .await
        .map_err(RunError::State)?;

    let sha256 = match sha256_path(&artifact.path) {
        Ok(digest) => Some(digest),
        Err(e) => {
            tracing::warn!(
                plugin = %spec.name,
                "could not hash {}: {:#}",
                artifact.path.display(),
                e
            );
            None
        }
    };
    Ok(Outcome::Committed {
        version,
        path: artifact.path,
        sha256,
    })
}
