//! One complete run: resolve, launch, gate, authenticate, download, close.

use crate::auth;
use crate::browser::{Browser, BrowserLauncher, LaunchOptions};
use crate::config::{PluginSpec, SPIGOT_SOURCE};
use crate::context::RunContext;
use crate::download::{self, RunSummary};
use crate::error::RunError;
use crate::gate;
use crate::pending;
use crate::screenshot::{self, Checkpoint};
use crate::staging;

/// Download every pending Spigot plugin.
///
/// No browser is launched when nothing is pending. Once launched, the browser
/// is closed before returning, whether the run succeeded or not.
pub async fn run_downloads<L: BrowserLauncher>(
    ctx: &RunContext,
    launcher: &L,
) -> Result<RunSummary, RunError> {
    tracing::info!("clearing temp directory {}", ctx.paths.staging_dir.display());
    staging::clear(&ctx.paths.staging_dir).map_err(RunError::Staging)?;

    let pending = pending::resolve(&ctx.config.plugins, &ctx.db, SPIGOT_SOURCE)
        .await
        .map_err(RunError::State)?;
    if pending.is_empty() {
        tracing::info!("no spigot plugins need to be downloaded; not starting a browser");
        return Ok(RunSummary::default());
    }

    tracing::info!(count = pending.len(), "starting browser");
    let options = LaunchOptions::new(&ctx.config, &ctx.env, ctx.paths.staging_dir.clone());
    let mut browser = launcher.launch(&options).await.map_err(RunError::Launch)?;

    let result = drive(&mut browser, ctx, &pending).await;
    // Gate and login failures capture their own screenshot.
    if matches!(result, Err(RunError::Staging(_) | RunError::State(_))) {
        screenshot::capture(&mut browser, &ctx.paths, Checkpoint::Error).await;
    }

    tracing::info!("closing browser");
    if let Err(e) = browser.close().await {
        tracing::warn!("browser did not close cleanly: {}", e);
    }
    result
}

async fn drive<B: Browser>(
    browser: &mut B,
    ctx: &RunContext,
    pending: &[PluginSpec],
) -> Result<RunSummary, RunError> {
    gate::pass_challenge(browser, ctx).await?;
    let auth = auth::authenticate(browser, ctx).await?;
    let mut summary = download::run_loop(browser, ctx, pending).await?;
    summary.auth = Some(auth);
    Ok(summary)
}
