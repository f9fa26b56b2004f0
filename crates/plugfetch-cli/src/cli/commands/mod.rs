//! CLI command handlers, one file per command.

mod approve;
mod clear_staging;
mod completions;
mod download;
mod set_latest;
mod status;
mod untrack;

pub use approve::run_approve;
pub use clear_staging::run_clear_staging;
pub use completions::run_completions;
pub use download::run_download;
pub use set_latest::run_set_latest;
pub use status::run_status;
pub use untrack::run_untrack;
