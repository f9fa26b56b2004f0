//! [`Browser`] over the W3C WebDriver protocol (a running `chromedriver`).
//!
//! Every command is a blocking libcurl request executed on tokio's blocking
//! pool, so the async side only ever awaits.

mod capabilities;
mod http;
#[cfg(test)]
mod stub_server;

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use super::{Browser, BrowserError, BrowserLauncher, Key, LaunchOptions};
use http::Method;

/// Key of the element reference object in WebDriver responses.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// How often element and navigation waits re-check the page.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Budget for the session delete issued from `Drop`, which blocks the current thread.
const DROP_DELETE_TIMEOUT: Duration = Duration::from_secs(2);

/// Budget for commands that return immediately (find, type, screenshot).
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Slack on top of the page-load timeout so chromedriver reports the timeout, not curl.
const PAGE_LOAD_SLACK: Duration = Duration::from_secs(30);

/// Launches Chrome sessions through a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    endpoint: String,
}

impl WebDriverLauncher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    type Browser = WebDriverBrowser;

    async fn launch(&self, options: &LaunchOptions) -> Result<WebDriverBrowser, BrowserError> {
        let body = capabilities::new_session_body(options);
        let url = format!("{}/session", self.endpoint);
        let value = blocking(move || http::call(Method::Post, &url, Some(&body), COMMAND_TIMEOUT))
            .await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| BrowserError::Protocol(format!("no sessionId in {value}")))?
            .to_string();
        tracing::debug!(
            session = %session_id,
            endpoint = %self.endpoint,
            "webdriver session created"
        );

        let mut browser = WebDriverBrowser {
            session_url: format!("{}/session/{}", self.endpoint, session_id),
            page_timeout: options.timeout,
            input_origin: None,
            closed: false,
        };

        // Older headless modes ignore download prefs; ask DevTools directly. Not every
        // driver exposes this endpoint, so failure only means prefs have to do.
        let behavior = json!({
            "cmd": "Page.setDownloadBehavior",
            "params": {
                "behavior": "allow",
                "downloadPath": options.download_dir.to_string_lossy(),
            },
        });
        if let Err(e) = browser
            .command(Method::Post, "/goog/cdp/execute", Some(behavior), COMMAND_TIMEOUT)
            .await
        {
            tracing::debug!("Page.setDownloadBehavior unavailable: {}", e);
        }

        Ok(browser)
    }
}

/// One WebDriver session with a single window.
#[derive(Debug)]
pub struct WebDriverBrowser {
    session_url: String,
    page_timeout: Duration,
    /// URL the page was on at the last key press; `wait_for_navigation` waits to leave it.
    input_origin: Option<String>,
    closed: bool,
}

async fn blocking<F>(f: F) -> Result<Value, BrowserError>
where
    F: FnOnce() -> Result<Value, BrowserError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BrowserError::Protocol(format!("webdriver call did not complete: {e}")))?
}

impl WebDriverBrowser {
    async fn command(
        &mut self,
        method: Method,
        path: &str,
        body: Option<Value>,
        timeout: Duration,
    ) -> Result<Value, BrowserError> {
        if self.closed {
            return Err(BrowserError::Closed);
        }
        let url = format!("{}{}", self.session_url, path);
        blocking(move || http::call(method, &url, body.as_ref(), timeout)).await
    }

    async fn find_element(&mut self, selector: &str) -> Result<String, BrowserError> {
        let body = json!({ "using": "css selector", "value": selector });
        let value = self
            .command(Method::Post, "/element", Some(body), COMMAND_TIMEOUT)
            .await?;
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BrowserError::Protocol(format!("no element reference in {value}")))
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        let value = self.command(Method::Get, "/url", None, COMMAND_TIMEOUT).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| BrowserError::Protocol(format!("url is not a string: {value}")))
    }

    async fn ready_state(&mut self) -> Result<String, BrowserError> {
        let body = json!({ "script": "return document.readyState", "args": [] });
        let value = self
            .command(Method::Post, "/execute/sync", Some(body), COMMAND_TIMEOUT)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Left `origin` (if any) and finished loading.
    async fn navigation_settled(&mut self, origin: Option<&str>) -> Result<bool, BrowserError> {
        if let Some(origin) = origin {
            if self.current_url().await? == origin {
                return Ok(false);
            }
        }
        Ok(self.ready_state().await? == "complete")
    }

    async fn key_actions(&mut self, keys: &[&str]) -> Result<(), BrowserError> {
        let mut actions = Vec::with_capacity(keys.len() * 2);
        for key in keys {
            actions.push(json!({ "type": "keyDown", "value": key }));
            actions.push(json!({ "type": "keyUp", "value": key }));
        }
        let body = json!({
            "actions": [{ "type": "key", "id": "keyboard", "actions": actions }]
        });
        self.command(Method::Post, "/actions", Some(body), COMMAND_TIMEOUT)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let timeout = self.page_timeout + PAGE_LOAD_SLACK;
        self.command(Method::Post, "/url", Some(json!({ "url": url })), timeout)
            .await?;
        Ok(())
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.find_element(selector).await {
                Ok(_) => return Ok(()),
                Err(e) if e.is_transient() => {
                    tracing::trace!(selector, "element not there yet: {}", e);
                }
                Err(e) => return Err(e),
            }
            if Instant::now() + POLL_INTERVAL > deadline {
                return Err(BrowserError::Timeout {
                    waited: timeout,
                    what: format!("element {selector}"),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_navigation(&mut self, timeout: Duration) -> Result<(), BrowserError> {
        let origin = self.input_origin.take();
        let deadline = Instant::now() + timeout;
        loop {
            match self.navigation_settled(origin.as_deref()).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) if e.is_transient() => {
                    tracing::trace!("page still navigating: {}", e);
                }
                Err(e) => return Err(e),
            }
            if Instant::now() + POLL_INTERVAL > deadline {
                return Err(BrowserError::Timeout {
                    waited: timeout,
                    what: "navigation".to_string(),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), BrowserError> {
        let value = self
            .command(Method::Get, "/screenshot", None, COMMAND_TIMEOUT)
            .await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| BrowserError::Protocol("screenshot is not a string".to_string()))?;
        let png = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| BrowserError::Protocol(format!("screenshot is not base64: {e}")))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, png).await?;
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), BrowserError> {
        let element = self.find_element(selector).await?;
        let path = format!("/element/{element}/value");
        self.command(Method::Post, &path, Some(json!({ "text": text })), COMMAND_TIMEOUT)
            .await?;
        Ok(())
    }

    async fn send_keys(&mut self, text: &str) -> Result<(), BrowserError> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        let keys: Vec<&str> = chars.iter().map(String::as_str).collect();
        self.key_actions(&keys).await
    }

    async fn press_key(&mut self, key: Key) -> Result<(), BrowserError> {
        self.input_origin = Some(self.current_url().await?);
        self.key_actions(&[key.webdriver_code()]).await
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        let result = self
            .command(Method::Delete, "", None, COMMAND_TIMEOUT)
            .await
            .map(|_| ());
        self.closed = true;
        result
    }
}

/// Fallback for paths that never reached `close()`, such as a panic mid-run.
/// A leaked session keeps Chrome running. The delete is a blocking curl call
/// on whatever thread drops the browser, bounded by [`DROP_DELETE_TIMEOUT`].
impl Drop for WebDriverBrowser {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = http::call(Method::Delete, &self.session_url, None, DROP_DELETE_TIMEOUT) {
            tracing::warn!("could not delete webdriver session on drop: {}", e);
        }
    }
}
