//! `plugfetch clear-staging` – empty the browser's download directory.

use anyhow::Result;
use plugfetch_core::config::FetchConfig;
use plugfetch_core::{staging, RunPaths};

pub fn run_clear_staging(cfg: &FetchConfig) -> Result<()> {
    let paths = RunPaths::from_config(cfg)?;
    let removed = staging::clear(&paths.staging_dir)?;
    let noun = if removed == 1 { "entry" } else { "entries" };
    println!("Removed {removed} {noun} from {}", paths.staging_dir.display());
    Ok(())
}
