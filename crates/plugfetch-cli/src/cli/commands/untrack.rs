//! `plugfetch untrack <name>` – remove a plugin's state record.

use anyhow::Result;
use plugfetch_core::state_db::PluginDb;

pub async fn run_untrack(db: &PluginDb, name: &str) -> Result<()> {
    if db.remove(name).await? {
        println!("Untracked {name}");
    } else {
        println!("{name} was not tracked");
    }
    Ok(())
}
