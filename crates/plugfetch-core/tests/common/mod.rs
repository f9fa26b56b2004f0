#![allow(dead_code)]

pub mod fake_browser;

use std::path::Path;
use tempfile::TempDir;

use plugfetch_core::config::{FetchConfig, PluginSpec};
use plugfetch_core::env::{Credentials, Environment};
use plugfetch_core::state_db::PluginDb;
use plugfetch_core::{RunContext, RunPaths};

pub const SITE: &str = "https://spigot.test";

pub fn spec(name: &str, resource: &str) -> PluginSpec {
    PluginSpec {
        name: name.to_string(),
        source: "spigot".to_string(),
        resource: resource.to_string(),
        jar: format!("{name}.jar"),
        zip_path: None,
        zip_pattern: None,
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        email: "ops@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

/// Config with every wait at zero so runs complete instantly.
pub fn fast_config(plugins: Vec<PluginSpec>) -> FetchConfig {
    let mut cfg = FetchConfig::default();
    cfg.cloudflare_timeout_ms = 1_000;
    cfg.navigation_delay_ms = 0;
    cfg.download_time_ms = 0;
    cfg.site_url = SITE.to_string();
    cfg.plugins = plugins;
    cfg
}

/// Temporary data, screenshot and state directories plus a context over them.
pub struct Harness {
    pub dir: TempDir,
    pub ctx: RunContext,
}

impl Harness {
    pub async fn new(plugins: Vec<PluginSpec>, credentials: Option<Credentials>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = PluginDb::open_at(dir.path().join("state").join("plugins.db"))
            .await
            .unwrap();
        let paths = RunPaths::under(&dir.path().join("data"), &dir.path().join("shots")).unwrap();
        std::fs::create_dir_all(&paths.screenshot_dir).unwrap();
        let env = Environment {
            proxy: None,
            chrome_path: None,
            credentials,
        };
        let ctx = RunContext::with_paths(fast_config(plugins), env, db, paths).unwrap();
        Self { dir, ctx }
    }

    pub fn db(&self) -> &PluginDb {
        &self.ctx.db
    }

    pub fn installed(&self, jar: &str) -> std::path::PathBuf {
        self.ctx.paths.plugins_dir.join(jar)
    }

    pub fn screenshot(&self, name: &str) -> std::path::PathBuf {
        self.ctx.paths.screenshot_dir.join(name)
    }

    pub fn staging_entries(&self) -> usize {
        count_entries(&self.ctx.paths.staging_dir)
    }
}

pub fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

pub fn download_url(resource: &str, version: &str) -> String {
    format!("{SITE}/resources/{resource}/download?version={version}")
}
