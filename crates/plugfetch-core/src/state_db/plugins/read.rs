//! Plugin read operations: find and list.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::super::db::PluginDb;
use super::super::types::PluginState;

fn state_from_row(row: &SqliteRow) -> PluginState {
    PluginState {
        name: row.get("name"),
        latest: row.get("latest"),
        approved: row.get("approved"),
        downloaded: row.get("downloaded"),
        updated_at: row.get("updated_at"),
    }
}

impl PluginDb {
    /// Fetch the state of one plugin; None if it is not tracked.
    pub async fn find(&self, name: &str) -> Result<Option<PluginState>> {
        let row = sqlx::query(
            r#"
            SELECT name, latest, approved, downloaded, updated_at
            FROM plugins
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(state_from_row))
    }

    /// List all tracked plugins, by name.
    pub async fn list(&self) -> Result<Vec<PluginState>> {
        let rows = sqlx::query(
            r#"
            SELECT name, latest, approved, downloaded, updated_at
            FROM plugins
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(state_from_row).collect())
    }
}
