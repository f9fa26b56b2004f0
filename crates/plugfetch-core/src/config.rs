use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Source tag of the plugins handled by the browser downloader.
pub const SPIGOT_SOURCE: &str = "spigot";

/// One `[[plugins]]` entry: where a plugin lives remotely and where its jar goes locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    /// Plugin name; also the key into the state database.
    pub name: String,
    /// Ecosystem the plugin is fetched from (e.g. "spigot", "github").
    pub source: String,
    /// Remote resource identifier (SpigotMC resource id).
    #[serde(deserialize_with = "string_or_number")]
    pub resource: String,
    /// Destination file name under the plugins directory.
    pub jar: String,
    /// Exact path of the jar inside a zip-packaged release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_path: Option<String>,
    /// Regex matched from the start of each entry name of a zip-packaged
    /// release; the first matching entry is extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_pattern: Option<String>,
}

impl PluginSpec {
    /// True if this spec belongs to `source` (case-insensitive).
    pub fn is_from(&self, source: &str) -> bool {
        self.source.eq_ignore_ascii_case(source)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Reasons a loaded configuration is rejected before any run starts.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duplicate plugin name '{0}'")]
    DuplicatePlugin(String),
    #[error("plugin '{0}': zip_path and zip_pattern are mutually exclusive")]
    ConflictingArchiveEntry(String),
    #[error("plugin '{name}': invalid zip_pattern: {reason}")]
    InvalidPattern { name: String, reason: String },
    #[error("plugin '{name}': jar must be a plain file name, got '{jar}'")]
    InvalidJarName { name: String, jar: String },
    #[error("cloudflare_timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Global configuration loaded from `~/.config/plugfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Run the browser without a visible window.
    pub headless_browser: bool,
    /// Pass `--no-sandbox` to the browser (containers, root users).
    pub no_sandbox_browser: bool,
    /// Time to wait for the Cloudflare challenge; also the element and navigation timeout.
    pub cloudflare_timeout_ms: u64,
    /// Delay between page navigations on the remote site.
    pub navigation_delay_ms: u64,
    /// Fixed wait after triggering a download before the staging directory is polled.
    pub download_time_ms: u64,
    /// Base URL of the remote site.
    pub site_url: String,
    /// WebDriver endpoint (a running `chromedriver`).
    pub webdriver_url: String,
    /// Optional user agent override for the browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Directory holding `temp/` (staging) and `plugins/`; defaults to the XDG data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Where diagnostic screenshots are written; defaults to the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_dir: Option<PathBuf>,
    /// Plugins in the order they are processed.
    pub plugins: Vec<PluginSpec>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            headless_browser: true,
            no_sandbox_browser: false,
            cloudflare_timeout_ms: 300_000,
            navigation_delay_ms: 10_000,
            download_time_ms: 10_000,
            site_url: "https://www.spigotmc.org".to_string(),
            webdriver_url: "http://127.0.0.1:9515".to_string(),
            user_agent: None,
            data_dir: None,
            screenshot_dir: None,
            plugins: Vec::new(),
        }
    }
}

impl FetchConfig {
    pub fn cloudflare_timeout(&self) -> Duration {
        Duration::from_millis(self.cloudflare_timeout_ms)
    }

    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }

    pub fn download_time(&self) -> Duration {
        Duration::from_millis(self.download_time_ms)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.cloudflare_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let mut seen = HashSet::new();
        for spec in &self.plugins {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicatePlugin(spec.name.clone()));
            }
            if spec.zip_path.is_some() && spec.zip_pattern.is_some() {
                return Err(ConfigError::ConflictingArchiveEntry(spec.name.clone()));
            }
            if let Some(pattern) = &spec.zip_pattern {
                regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                    name: spec.name.clone(),
                    reason: e.to_string(),
                })?;
            }
            let plain = Path::new(&spec.jar)
                .file_name()
                .is_some_and(|f| f == spec.jar.as_str());
            if !plain {
                return Err(ConfigError::InvalidJarName {
                    name: spec.name.clone(),
                    jar: spec.jar.clone(),
                });
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("plugfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the default location, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Load configuration from `path`, writing the defaults there first if the file is missing.
pub fn load_or_init_at(path: &Path) -> Result<FetchConfig> {
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FetchConfig::default();
        assert!(cfg.headless_browser);
        assert!(!cfg.no_sandbox_browser);
        assert_eq!(cfg.cloudflare_timeout(), Duration::from_secs(300));
        assert_eq!(cfg.navigation_delay(), Duration::from_secs(10));
        assert_eq!(cfg.download_time(), Duration::from_secs(10));
        assert!(cfg.plugins.is_empty());
    }

    #[test]
    fn config_toml_roundtrip_keeps_defaults() {
        let cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.site_url, cfg.site_url);
        assert_eq!(parsed.webdriver_url, cfg.webdriver_url);
        assert_eq!(parsed.cloudflare_timeout_ms, cfg.cloudflare_timeout_ms);
        assert!(parsed.user_agent.is_none());
    }

    #[test]
    fn plugins_keep_file_order_and_accept_numeric_resource() {
        let toml = r#"
            headless_browser = false
            download_time_ms = 15000

            [[plugins]]
            name = "Zeta"
            source = "Spigot"
            resource = 9089
            jar = "Zeta.jar"

            [[plugins]]
            name = "Alpha"
            source = "github"
            resource = "owner/alpha"
            jar = "Alpha.jar"

            [[plugins]]
            name = "Middle"
            source = "spigot"
            resource = "1234"
            jar = "Middle.jar"
            zip_path = "Middle/Middle.jar"
        "#;
        let cfg: FetchConfig = toml::from_str(toml).unwrap();
        assert!(!cfg.headless_browser);
        assert_eq!(cfg.download_time_ms, 15000);
        assert_eq!(cfg.navigation_delay_ms, 10_000);
        let names: Vec<_> = cfg.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Middle"]);
        assert_eq!(cfg.plugins[0].resource, "9089");
        assert!(cfg.plugins[0].is_from(SPIGOT_SOURCE));
        assert!(!cfg.plugins[1].is_from(SPIGOT_SOURCE));
        assert_eq!(cfg.plugins[2].zip_path.as_deref(), Some("Middle/Middle.jar"));
        cfg.validate().unwrap();
    }

    fn spec(name: &str, jar: &str) -> PluginSpec {
        PluginSpec {
            name: name.to_string(),
            source: "spigot".to_string(),
            resource: "1".to_string(),
            jar: jar.to_string(),
            zip_path: None,
            zip_pattern: None,
        }
    }

    #[test]
    fn validate_rejects_duplicates_and_bad_entries() {
        let mut cfg = FetchConfig::default();
        cfg.plugins = vec![spec("A", "A.jar"), spec("A", "B.jar")];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicatePlugin("A".to_string()))
        );

        let mut both = spec("C", "C.jar");
        both.zip_path = Some("C.jar".to_string());
        both.zip_pattern = Some("C.*\\.jar".to_string());
        cfg.plugins = vec![both];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ConflictingArchiveEntry("C".to_string()))
        );

        let mut bad = spec("D", "D.jar");
        bad.zip_pattern = Some("(".to_string());
        cfg.plugins = vec![bad];
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));

        cfg.plugins = vec![spec("E", "../E.jar")];
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidJarName { .. })
        ));

        cfg.plugins.clear();
        cfg.cloudflare_timeout_ms = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn load_or_init_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.site_url, created.site_url);
        assert_eq!(loaded.download_time_ms, created.download_time_ms);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [[plugins]]
            name = "A"
            source = "spigot"
            resource = "1"
            jar = "a/b.jar"
            "#,
        )
        .unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("plain file name"));
    }
}
