use std::path::PathBuf;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::env::Environment;

/// How the browser is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Run without a visible window.
    pub headless: bool,
    /// Browser binary to use instead of the driver's default.
    pub executable_override: Option<PathBuf>,
    /// Pass `--no-sandbox`.
    pub sandbox_disabled: bool,
    /// Route all traffic through this proxy endpoint.
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    /// Downloads are accepted without prompting and saved here. Must be absolute.
    pub download_dir: PathBuf,
    /// Applied to page loads and element waits alike.
    pub timeout: Duration,
}

impl LaunchOptions {
    pub fn new(cfg: &FetchConfig, env: &Environment, download_dir: PathBuf) -> Self {
        Self {
            headless: cfg.headless_browser,
            executable_override: env.chrome_path.clone(),
            sandbox_disabled: cfg.no_sandbox_browser,
            proxy: env.proxy.clone(),
            user_agent: cfg.user_agent.clone(),
            download_dir,
            timeout: cfg.cloudflare_timeout(),
        }
    }

    /// Chromium command-line switches for these options.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--window-size=1920,1080".to_string(),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }
        if self.sandbox_disabled {
            args.push("--no-sandbox".to_string());
        }
        if let Some(proxy) = &self.proxy {
            args.push(format!("--proxy-server={proxy}"));
        }
        if let Some(ua) = &self.user_agent {
            args.push(format!("--user-agent={ua}"));
        }
        args
    }
}
