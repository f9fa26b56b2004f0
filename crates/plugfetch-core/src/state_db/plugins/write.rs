//! Plugin write operations: approve, record latest/downloaded, remove.

use anyhow::{Context, Result};

use super::super::db::{unix_timestamp, PluginDb};
use super::super::types::PluginState;

impl PluginDb {
    /// Set the approved version, tracking the plugin if it was not tracked yet.
    pub async fn approve(&self, name: &str, version: &str) -> Result<PluginState> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            INSERT INTO plugins (name, latest, approved, downloaded, created_at, updated_at)
            VALUES (?1, NULL, ?2, NULL, ?3, ?3)
            ON CONFLICT(name) DO UPDATE SET
                approved = excluded.approved,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(name)
        .bind(version)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find(name)
            .await?
            .with_context(|| format!("plugin {name} vanished after approve"))
    }

    /// Record the newest version seen upstream, tracking the plugin if needed.
    pub async fn set_latest(&self, name: &str, version: &str) -> Result<PluginState> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            INSERT INTO plugins (name, latest, approved, downloaded, created_at, updated_at)
            VALUES (?1, ?2, NULL, NULL, ?3, ?3)
            ON CONFLICT(name) DO UPDATE SET
                latest = excluded.latest,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(name)
        .bind(version)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find(name)
            .await?
            .with_context(|| format!("plugin {name} vanished after set_latest"))
    }

    /// Record a successful download. Only tracked plugins can be updated.
    pub async fn set_downloaded(&self, name: &str, version: &str) -> Result<PluginState> {
        let now = unix_timestamp();
        let result = sqlx::query(
            r#"
            UPDATE plugins
            SET downloaded = ?1,
                updated_at = ?2
            WHERE name = ?3
            "#,
        )
        .bind(version)
        .bind(now)
        .bind(name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("plugin {name} is not tracked");
        }

        self.find(name)
            .await?
            .with_context(|| format!("plugin {name} vanished after set_downloaded"))
    }

    /// Stop tracking a plugin. Returns false if it was not tracked.
    pub async fn remove(&self, name: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM plugins
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
