//! Diagnostic screenshots at fixed checkpoints of the browser session.

use std::path::PathBuf;

use crate::browser::Browser;
use crate::context::RunPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// The session is about to be abandoned.
    Error,
    /// The anti-bot challenge passed and the login form rendered.
    Loaded,
    /// Credentials were submitted.
    Authenticated,
}

impl Checkpoint {
    pub fn file_name(self) -> &'static str {
        match self {
            Checkpoint::Error => "error.png",
            Checkpoint::Loaded => "loaded.png",
            Checkpoint::Authenticated => "authenticated.png",
        }
    }
}

impl RunPaths {
    pub fn screenshot(&self, checkpoint: Checkpoint) -> PathBuf {
        self.screenshot_dir.join(checkpoint.file_name())
    }
}

/// Save the checkpoint screenshot. A failed capture is only logged.
pub async fn capture<B: Browser + ?Sized>(
    browser: &mut B,
    paths: &RunPaths,
    checkpoint: Checkpoint,
) {
    let path = paths.screenshot(checkpoint);
    match browser.screenshot(&path).await {
        Ok(()) => tracing::info!("saved screenshot {}", path.display()),
        Err(e) => tracing::warn!("could not save screenshot {}: {}", path.display(), e),
    }
}
