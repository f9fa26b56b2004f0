//! `plugfetch approve <name> <version>` – set the version the next download run installs.

use anyhow::Result;
use plugfetch_core::config::FetchConfig;
use plugfetch_core::state_db::PluginDb;

pub async fn run_approve(
    db: &PluginDb,
    cfg: &FetchConfig,
    name: &str,
    version: &str,
) -> Result<()> {
    if !cfg.plugins.iter().any(|s| s.name == name) {
        tracing::warn!("plugin {} is not in the config; it will not be downloaded", name);
    }
    let state = db.approve(name, version).await?;
    match state.pending_version() {
        Some(v) => println!("Approved {name} {v}"),
        None => println!("Approved {name} {version} (already downloaded)"),
    }
    Ok(())
}
