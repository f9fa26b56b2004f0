//! Everything a run needs, passed explicitly to each component.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::FetchConfig;
use crate::env::Environment;
use crate::site::Site;
use crate::state_db::PluginDb;

/// Directories a run reads and writes. All absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// Where the browser saves downloads.
    pub staging_dir: PathBuf,
    /// Where installed jars live.
    pub plugins_dir: PathBuf,
    pub screenshot_dir: PathBuf,
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("resolve working directory")?
        .join(path))
}

impl RunPaths {
    /// `<data_dir>/temp` and `<data_dir>/plugins`.
    pub fn under(data_dir: &Path, screenshot_dir: &Path) -> Result<Self> {
        let data_dir = absolute(data_dir)?;
        Ok(Self {
            staging_dir: data_dir.join("temp"),
            plugins_dir: data_dir.join("plugins"),
            screenshot_dir: absolute(screenshot_dir)?,
        })
    }

    /// Paths from config, falling back to the XDG data dir and the working directory.
    pub fn from_config(cfg: &FetchConfig) -> Result<Self> {
        let data_dir = match &cfg.data_dir {
            Some(dir) => dir.clone(),
            None => xdg::BaseDirectories::with_prefix("plugfetch")?.create_data_directory("")?,
        };
        let screenshot_dir = cfg
            .screenshot_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Self::under(&data_dir, &screenshot_dir)
    }
}

/// Config, environment, state store and paths for one run.
pub struct RunContext {
    pub config: FetchConfig,
    pub env: Environment,
    pub db: PluginDb,
    pub paths: RunPaths,
    pub site: Site,
}

impl RunContext {
    pub fn new(config: FetchConfig, env: Environment, db: PluginDb) -> Result<Self> {
        let paths = RunPaths::from_config(&config)?;
        Self::with_paths(config, env, db, paths)
    }

    pub fn with_paths(
        config: FetchConfig,
        env: Environment,
        db: PluginDb,
        paths: RunPaths,
    ) -> Result<Self> {
        let site = Site::parse(&config.site_url)?;
        Ok(Self {
            config,
            env,
            db,
            paths,
            site,
        })
    }
}
