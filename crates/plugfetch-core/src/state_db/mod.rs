//! Persistent plugin state database (SQLite via sqlx).
//!
//! Stores, per plugin, the latest known version, the approved (target)
//! version and the version last downloaded into the plugins directory.

pub mod db;
mod plugins;
pub mod types;

pub use db::*;
pub use types::*;
