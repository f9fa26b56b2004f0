//! Optional login, only when credentials are present in the environment.

use crate::browser::{Browser, BrowserError, Key};
use crate::context::RunContext;
use crate::env::Credentials;
use crate::error::RunError;
use crate::screenshot::{self, Checkpoint};
use crate::site::LOGIN_MARKER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No credentials configured.
    Skipped,
    /// The form was submitted. `navigated` is false when the post-submit wait failed.
    Submitted { navigated: bool },
}

async fn enter_credentials<B: Browser + ?Sized>(
    browser: &mut B,
    creds: &Credentials,
) -> Result<(), BrowserError> {
    browser.type_text(LOGIN_MARKER, &creds.email).await?;
    browser.press_key(Key::Tab).await?;
    browser.send_keys(&creds.password).await?;
    browser.press_key(Key::Tab).await?;
    browser.press_key(Key::Enter).await
}

/// Log in on the already loaded login page.
///
/// Failing to enter credentials is fatal: the session's login state is unknown.
/// A failed wait for the post-submit navigation is not (already logged in, or a redirect race).
pub async fn authenticate<B: Browser + ?Sized>(
    browser: &mut B,
    ctx: &RunContext,
) -> Result<AuthOutcome, RunError> {
    let Some(creds) = &ctx.env.credentials else {
        tracing::info!("skipping authentication");
        return Ok(AuthOutcome::Skipped);
    };

    tracing::info!("logging into SpigotMC as {}", creds.email);
    if let Err(e) = enter_credentials(browser, creds).await {
        screenshot::capture(browser, &ctx.paths, Checkpoint::Error).await;
        tracing::error!("could not enter credentials: {}", e);
        return Err(RunError::CredentialEntry(e));
    }

    let navigated = match browser.wait_for_navigation(ctx.config.cloudflare_timeout()).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("no navigation after login: {}", e);
            false
        }
    };
    screenshot::capture(browser, &ctx.paths, Checkpoint::Authenticated).await;
    Ok(AuthOutcome::Submitted { navigated })
}
