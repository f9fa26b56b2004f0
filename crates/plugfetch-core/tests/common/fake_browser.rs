//! Scripted in-process browser. Navigations to configured URLs drop files
//! into the download directory the way a real browser download would.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use plugfetch_core::browser::{Browser, BrowserError, BrowserLauncher, Key, LaunchOptions};
use plugfetch_core::state_db::PluginDb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    WaitElement(String),
    WaitNavigation,
    Screenshot(PathBuf),
    TypeText(String, String),
    SendKeys(String),
    Press(Key),
    Close,
}

/// A file the browser "downloads" when a URL containing `url_part` is opened.
#[derive(Debug, Clone)]
pub struct Deposit {
    pub url_part: String,
    pub files: Vec<(String, Vec<u8>)>,
}

/// Marks a plugin as downloaded while the login page loads, after the pending set was resolved.
#[derive(Clone)]
pub struct Satisfy {
    pub db: PluginDb,
    pub name: String,
    pub version: String,
}

#[derive(Clone)]
pub struct Script {
    pub fail_launch: bool,
    pub marker_appears: bool,
    /// The marker wait reports a dead session instead of timing out.
    pub session_lost_at_marker: bool,
    pub fail_typing: bool,
    pub fail_navigation_wait: bool,
    pub fail_screenshots: bool,
    pub deposits: Vec<Deposit>,
    pub satisfy_on_login: Option<Satisfy>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            fail_launch: false,
            marker_appears: true,
            session_lost_at_marker: false,
            fail_typing: false,
            fail_navigation_wait: false,
            fail_screenshots: false,
            deposits: Vec::new(),
            satisfy_on_login: None,
        }
    }
}

impl Script {
    pub fn deposit(mut self, url_part: &str, file_name: &str, body: &[u8]) -> Self {
        self.deposits.push(Deposit {
            url_part: url_part.to_string(),
            files: vec![(file_name.to_string(), body.to_vec())],
        });
        self
    }

    pub fn deposit_many(mut self, url_part: &str, files: &[(&str, &[u8])]) -> Self {
        self.deposits.push(Deposit {
            url_part: url_part.to_string(),
            files: files
                .iter()
                .map(|(name, body)| (name.to_string(), body.to_vec()))
                .collect(),
        });
        self
    }
}

/// Shared between the launcher, its browser and the test.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    launches: AtomicUsize,
    closes: AtomicUsize,
    options: Mutex<Option<LaunchOptions>>,
}

impl Recorder {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Navigate(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn launch_options(&self) -> Option<LaunchOptions> {
        self.options.lock().unwrap().clone()
    }
}

pub struct FakeLauncher {
    script: Script,
    pub recorder: Arc<Recorder>,
}

impl FakeLauncher {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            recorder: Arc::new(Recorder::default()),
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    type Browser = FakeBrowser;

    async fn launch(&self, options: &LaunchOptions) -> Result<FakeBrowser, BrowserError> {
        self.recorder.launches.fetch_add(1, Ordering::SeqCst);
        *self.recorder.options.lock().unwrap() = Some(options.clone());
        if self.script.fail_launch {
            return Err(BrowserError::Protocol("session not created".to_string()));
        }
        Ok(FakeBrowser {
            script: self.script.clone(),
            download_dir: options.download_dir.clone(),
            recorder: Arc::clone(&self.recorder),
            closed: false,
        })
    }
}

pub struct FakeBrowser {
    script: Script,
    download_dir: PathBuf,
    recorder: Arc<Recorder>,
    closed: bool,
}

impl FakeBrowser {
    fn check_open(&self) -> Result<(), BrowserError> {
        if self.closed {
            Err(BrowserError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.check_open()?;
        self.recorder.record(Call::Navigate(url.to_string()));
        if url.ends_with("/login") {
            if let Some(s) = &self.script.satisfy_on_login {
                s.db.set_downloaded(&s.name, &s.version)
                    .await
                    .map_err(|e| BrowserError::Protocol(e.to_string()))?;
            }
        }
        let Some(deposit) = self.script.deposits.iter().find(|d| url.contains(&d.url_part)) else {
            return Ok(());
        };
        for (name, body) in &deposit.files {
            std::fs::write(self.download_dir.join(name), body)?;
        }
        // Chrome reports a download as an aborted navigation.
        Err(BrowserError::Protocol("net::ERR_ABORTED".to_string()))
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.check_open()?;
        self.recorder.record(Call::WaitElement(selector.to_string()));
        if self.script.session_lost_at_marker {
            return Err(BrowserError::WebDriver {
                error: "invalid session id".to_string(),
                message: "session deleted because of page crash".to_string(),
            });
        }
        if self.script.marker_appears {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                waited: timeout,
                what: format!("element {selector}"),
            })
        }
    }

    async fn wait_for_navigation(&mut self, timeout: Duration) -> Result<(), BrowserError> {
        self.check_open()?;
        self.recorder.record(Call::WaitNavigation);
        if self.script.fail_navigation_wait {
            Err(BrowserError::Timeout {
                waited: timeout,
                what: "navigation".to_string(),
            })
        } else {
            Ok(())
        }
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), BrowserError> {
        self.check_open()?;
        self.recorder.record(Call::Screenshot(path.to_path_buf()));
        if self.script.fail_screenshots {
            return Err(BrowserError::Protocol("screenshot failed".to_string()));
        }
        std::fs::write(path, b"\x89PNG")?;
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), BrowserError> {
        self.check_open()?;
        self.recorder
            .record(Call::TypeText(selector.to_string(), text.to_string()));
        if self.script.fail_typing {
            return Err(BrowserError::WebDriver {
                error: "element not interactable".to_string(),
                message: selector.to_string(),
            });
        }
        Ok(())
    }

    async fn send_keys(&mut self, text: &str) -> Result<(), BrowserError> {
        self.check_open()?;
        self.recorder.record(Call::SendKeys(text.to_string()));
        Ok(())
    }

    async fn press_key(&mut self, key: Key) -> Result<(), BrowserError> {
        self.check_open()?;
        self.recorder.record(Call::Press(key));
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.check_open()?;
        self.closed = true;
        self.recorder.record(Call::Close);
        self.recorder.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
