//! CLI for plugfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use plugfetch_core::config;
use plugfetch_core::state_db::PluginDb;
use std::path::PathBuf;

use commands::{
    run_approve, run_clear_staging, run_completions, run_download, run_set_latest, run_status,
    run_untrack,
};

/// Top-level CLI for plugfetch.
#[derive(Debug, Parser)]
#[command(name = "plugfetch")]
#[command(
    about = "Fetch approved plugin versions from SpigotMC through a browser session",
    long_about = None
)]
pub struct Cli {
    /// Config file [default: $XDG_CONFIG_HOME/plugfetch/config.toml].
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Plugin state database [default: $XDG_STATE_HOME/plugfetch/plugins.db].
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every approved plugin version that is not installed yet.
    Download,

    /// Show tracked plugins with their latest, approved and downloaded versions.
    Status,

    /// Approve a version for download (starts tracking the plugin).
    Approve {
        /// Plugin name as configured.
        name: String,
        version: String,
    },

    /// Record the newest version available upstream (starts tracking the plugin).
    SetLatest {
        /// Plugin name as configured.
        name: String,
        version: String,
    },

    /// Forget a plugin's state.
    Untrack {
        /// Plugin name as configured.
        name: String,
    },

    /// Empty the staging directory.
    ClearStaging,

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            return run_completions(shell);
        }

        let cfg = match &cli.config {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let db = match &cli.db {
            Some(path) => PluginDb::open_at(path).await?,
            None => PluginDb::open_default().await?,
        };

        match cli.command {
            CliCommand::Download => run_download(cfg, db).await?,
            CliCommand::Status => run_status(&db, &cfg).await?,
            CliCommand::Approve { name, version } => {
                run_approve(&db, &cfg, &name, &version).await?
            }
            CliCommand::SetLatest { name, version } => run_set_latest(&db, &name, &version).await?,
            CliCommand::Untrack { name } => run_untrack(&db, &name).await?,
            CliCommand::ClearStaging => run_clear_staging(&cfg)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
