//! Pending-set resolution: which configured plugins need a download this run.

use anyhow::Result;

use crate::config::PluginSpec;
use crate::state_db::PluginDb;

/// Specs from `source` whose persisted approved version differs from the
/// downloaded one, in configuration order.
///
/// Each candidate's state is looked up one at a time; an untracked plugin is
/// never pending.
pub async fn resolve(
    plugins: &[PluginSpec],
    db: &PluginDb,
    source: &str,
) -> Result<Vec<PluginSpec>> {
    let mut pending = Vec::new();
    for spec in plugins.iter().filter(|p| p.is_from(source)) {
        match db.find(&spec.name).await? {
            None => tracing::debug!(plugin = %spec.name, "not tracked, skipping"),
            Some(state) if state.needs_download() => pending.push(spec.clone()),
            Some(_) => tracing::debug!(plugin = %spec.name, "up to date"),
        }
    }
    Ok(pending)
}
