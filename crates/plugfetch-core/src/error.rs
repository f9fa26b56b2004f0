//! Conditions that abort a whole run.

use std::time::Duration;

use crate::browser::BrowserError;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("staging directory unusable")]
    Staging(#[source] anyhow::Error),
    #[error("plugin state store failed")]
    State(#[source] anyhow::Error),
    #[error("could not launch browser")]
    Launch(#[source] BrowserError),
    #[error(
        "login page did not load within {}s (Cloudflare challenge not passed)",
        .waited.as_secs()
    )]
    ChallengeTimeout {
        waited: Duration,
        #[source]
        source: BrowserError,
    },
    /// The browser stopped answering while the login page was awaited.
    #[error("lost the browser while waiting for the login page")]
    LoginPage(#[source] BrowserError),
    #[error("could not enter credentials")]
    CredentialEntry(#[source] BrowserError),
}
