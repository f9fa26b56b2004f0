//! Browser capability the downloader drives, and its WebDriver backend.
//!
//! The downloader only needs a handful of operations on one page: navigate,
//! wait for an element or a navigation, take a screenshot, type and press
//! keys, close. Anything that can do these satisfies [`Browser`].

mod error;
mod launch;
pub mod webdriver;

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

pub use error::BrowserError;
pub use launch::LaunchOptions;

/// Non-text keys the login flow presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
}

impl Key {
    /// Code point of the key in the WebDriver key table.
    pub fn webdriver_code(self) -> &'static str {
        match self {
            Key::Tab => "\u{E004}",
            Key::Enter => "\u{E007}",
        }
    }
}

/// One controlled page.
#[async_trait]
pub trait Browser: Send {
    /// Load `url`. Returns once the page load finished or failed.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Wait until an element matching the CSS `selector` exists.
    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Wait until the page has navigated away from where the last key press
    /// happened and finished loading.
    async fn wait_for_navigation(&mut self, timeout: Duration) -> Result<(), BrowserError>;

    /// Save a PNG screenshot of the current page.
    async fn screenshot(&mut self, path: &Path) -> Result<(), BrowserError>;

    /// Type `text` into the element matching `selector`.
    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), BrowserError>;

    /// Type `text` into whatever element has focus.
    async fn send_keys(&mut self, text: &str) -> Result<(), BrowserError>;

    async fn press_key(&mut self, key: Key) -> Result<(), BrowserError>;

    /// End the session and release the browser process.
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Starts browsers. The downloader launches at most one per run.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Browser: Browser;

    async fn launch(&self, options: &LaunchOptions) -> Result<Self::Browser, BrowserError>;
}
