//! `plugfetch set-latest <name> <version>` – record the newest upstream version.
//!
//! Update checkers call this; `status` then shows whether the approved version lags behind.

use anyhow::Result;
use plugfetch_core::state_db::PluginDb;

pub async fn run_set_latest(db: &PluginDb, name: &str, version: &str) -> Result<()> {
    let state = db.set_latest(name, version).await?;
    match state.approved.as_deref() {
        Some(approved) if approved != version => {
            println!("{name}: latest {version}, approved {approved}")
        }
        Some(_) => println!("{name}: latest {version} is approved"),
        None => println!("{name}: latest {version}, nothing approved yet"),
    }
    Ok(())
}
