use plugfetch_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable, logging to stderr only: {:#}", err);
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("plugfetch error: {:#}", err);
        std::process::exit(1);
    }
}
