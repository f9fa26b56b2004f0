use std::time::Duration;

/// Failure of a browser operation.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("timed out after {}s waiting for {what}", .waited.as_secs())]
    Timeout { waited: Duration, what: String },
    /// Error object returned by the WebDriver endpoint.
    #[error("webdriver {error}: {message}")]
    WebDriver { error: String, message: String },
    #[error("webdriver transport: {0}")]
    Transport(#[from] curl::Error),
    #[error("unexpected webdriver response: {0}")]
    Protocol(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("browser session already closed")]
    Closed,
}

impl BrowserError {
    /// True for WebDriver errors a page can report while it is still loading or
    /// reloading itself (missing element, stale reference, lost execution context).
    /// A dead session is never transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, BrowserError::WebDriver { error, .. } if error != "invalid session id")
    }
}
