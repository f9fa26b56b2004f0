//! `plugfetch download` – run the browser-driven download of pending plugins.

use anyhow::{Context, Result};
use plugfetch_core::auth::AuthOutcome;
use plugfetch_core::browser::webdriver::WebDriverLauncher;
use plugfetch_core::config::FetchConfig;
use plugfetch_core::download::{Outcome, RunSummary, SkipReason};
use plugfetch_core::env::Environment;
use plugfetch_core::state_db::PluginDb;
use plugfetch_core::{run_downloads, RunContext};

pub async fn run_download(cfg: FetchConfig, db: PluginDb) -> Result<()> {
    let launcher = WebDriverLauncher::new(cfg.webdriver_url.clone());
    let ctx = RunContext::new(cfg, Environment::from_env(), db)?;
    let summary = run_downloads(&ctx, &launcher)
        .await
        .context("download run aborted")?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    if summary.is_empty() {
        println!("Nothing to download.");
        return;
    }
    match summary.auth {
        Some(AuthOutcome::Submitted { navigated: true }) => println!("Logged in."),
        Some(AuthOutcome::Submitted { navigated: false }) => {
            println!("Login submitted, but the page did not navigate; see authenticated.png.")
        }
        Some(AuthOutcome::Skipped) => println!("Not logged in (no credentials)."),
        None => {}
    }
    println!("{:<24} {:<10} {:<12} {}", "PLUGIN", "RESULT", "VERSION", "DETAIL");
    for report in &summary.reports {
        let (result, version, detail) = match &report.outcome {
            Outcome::Committed { version, path, sha256 } => (
                "ok",
                version.as_str(),
                format!(
                    "{} sha256:{}",
                    path.display(),
                    sha256.as_deref().unwrap_or("-")
                ),
            ),
            Outcome::Skipped(reason) => {
                let detail = match reason {
                    SkipReason::Untracked => "no longer tracked",
                    SkipReason::NoApproval => "no approved version",
                    SkipReason::UpToDate => "already installed",
                };
                ("skipped", "-", detail.to_string())
            }
            Outcome::Failed { version, failure } => {
                ("failed", version.as_str(), failure.to_string())
            }
        };
        println!("{:<24} {:<10} {:<12} {}", report.name, result, version, detail);
    }
    println!("{} plugin(s) installed.", summary.committed().count());
    let failed = summary.failed().count();
    if failed > 0 {
        println!("{failed} plugin(s) failed; they stay pending for the next run.");
    }
}
