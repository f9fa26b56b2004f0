//! Sequential download loop over the pending set.

mod attempt;
pub mod summary;

pub use summary::{Failure, Outcome, PluginReport, RunSummary, SkipReason};

use crate::browser::Browser;
use crate::config::PluginSpec;
use crate::context::RunContext;
use crate::error::RunError;

/// Attempt each pending plugin in order. A failed attempt is logged and the
/// loop moves on; only staging and state-store errors stop it.
pub async fn run_loop<B: Browser + ?Sized>(
    browser: &mut B,
    ctx: &RunContext,
    pending: &[PluginSpec],
) -> Result<RunSummary, RunError> {
    let mut summary = RunSummary::default();
    for spec in pending {
        let outcome = attempt::attempt(browser, ctx, spec).await?;
        match &outcome {
            Outcome::Committed { version, sha256, .. } => tracing::info!(
                plugin = %spec.name,
                version = %version,
                sha256 = sha256.as_deref().unwrap_or("-"),
                "downloaded {}",
                spec.name
            ),
            Outcome::Skipped(reason) => {
                tracing::debug!(plugin = %spec.name, ?reason, "skipped")
            }
            Outcome::Failed { version, failure } => tracing::warn!(
                plugin = %spec.name,
                version = %version,
                "failed to download {}: {}",
                spec.name,
                failure
            ),
        }
        summary.push(&spec.name, outcome);
    }
    Ok(summary)
}
