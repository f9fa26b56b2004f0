//! `plugfetch status` – show tracked plugins.

use anyhow::Result;
use plugfetch_core::config::FetchConfig;
use plugfetch_core::state_db::PluginDb;

pub async fn run_status(db: &PluginDb, cfg: &FetchConfig) -> Result<()> {
    let plugins = db.list().await?;
    if plugins.is_empty() {
        println!("No tracked plugins.");
        return Ok(());
    }
    println!(
        "{:<24} {:<12} {:<12} {:<12} {}",
        "NAME", "LATEST", "APPROVED", "DOWNLOADED", "STATE"
    );
    for p in plugins {
        let state = if !cfg.plugins.iter().any(|s| s.name == p.name) {
            "not configured"
        } else if p.needs_download() {
            "pending"
        } else if p.approved.is_none() {
            "unapproved"
        } else {
            "up to date"
        };
        println!(
            "{:<24} {:<12} {:<12} {:<12} {}",
            p.name,
            p.latest.as_deref().unwrap_or("-"),
            p.approved.as_deref().unwrap_or("-"),
            p.downloaded.as_deref().unwrap_or("-"),
            state
        );
    }
    Ok(())
}
