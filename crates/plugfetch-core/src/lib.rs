//! plugfetch core: downloads operator-approved plugin versions from SpigotMC
//! through a real browser session and installs them as jars.

pub mod auth;
pub mod browser;
pub mod checksum;
pub mod config;
pub mod context;
pub mod download;
pub mod env;
pub mod error;
pub mod gate;
pub mod logging;
pub mod materialize;
pub mod pending;
pub mod run;
pub mod screenshot;
pub mod site;
pub mod staging;
pub mod state_db;

pub use context::{RunContext, RunPaths};
pub use download::RunSummary;
pub use error::RunError;
pub use run::run_downloads;
