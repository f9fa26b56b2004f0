//! Anti-bot gate: the login form only renders once Cloudflare lets the session through.

use tokio::time::sleep;

use crate::browser::{Browser, BrowserError};
use crate::context::RunContext;
use crate::error::RunError;
use crate::screenshot::{self, Checkpoint};
use crate::site::LOGIN_MARKER;

/// Open the login page and wait for the login form. Fatal on timeout.
pub async fn pass_challenge<B: Browser + ?Sized>(
    browser: &mut B,
    ctx: &RunContext,
) -> Result<(), RunError> {
    let login = ctx.site.login_url();
    tracing::info!("loading {} (waiting for Cloudflare)", login);
    if let Err(e) = browser.navigate(login.as_str()).await {
        // The challenge page can hold the load open; the marker wait decides.
        tracing::warn!("login page load reported: {}", e);
    }

    let timeout = ctx.config.cloudflare_timeout();
    if let Err(source) = browser.wait_for_element(LOGIN_MARKER, timeout).await {
        screenshot::capture(browser, &ctx.paths, Checkpoint::Error).await;
        tracing::error!("login form never appeared: {}", source);
        return Err(match source {
            BrowserError::Timeout { .. } => RunError::ChallengeTimeout {
                waited: timeout,
                source,
            },
            other => RunError::LoginPage(other),
        });
    }

    tracing::info!("found login page");
    screenshot::capture(browser, &ctx.paths, Checkpoint::Loaded).await;
    sleep(ctx.config.navigation_delay()).await;
    Ok(())
}
