//! `retry` command: re-fetch previously failed usernames and patch the
//! successes into existing result CSVs.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use tkscrape_client::FetchOutcome;
use tkscrape_core::{AppConfig, ProfileRecord};

use crate::scrape::{build_client, fetch_all, RunSummary};

#[derive(Debug, Clone)]
pub(crate) struct RetryOptions {
    pub failed_lists: Vec<PathBuf>,
    pub csvs: Vec<PathBuf>,
    pub still_failed: PathBuf,
    pub concurrency: usize,
}

/// Usernames from every readable list, first occurrence wins. Missing lists
/// are reported and skipped.
fn collect_failed_usernames(lists: &[PathBuf]) -> anyhow::Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut usernames = Vec::new();
    for path in lists {
        match tkscrape_store::read_username_list(path) {
            Ok(names) => {
                println!("loaded {} usernames from {}", names.len(), path.display());
                for name in names {
                    if seen.insert(name.clone()) {
                        usernames.push(name);
                    }
                }
            }
            Err(e) if e.is_not_found() => {
                println!("skipping missing list {}", path.display());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        }
    }
    Ok(usernames)
}

pub(crate) async fn run_retry(
    config: &AppConfig,
    options: &RetryOptions,
) -> anyhow::Result<RunSummary> {
    let usernames = collect_failed_usernames(&options.failed_lists)?;
    if usernames.is_empty() {
        println!("no usernames to retry");
        return Ok(RunSummary::from_outcomes(&[]));
    }

    tracing::debug!(
        retry_delay_secs = config.retry_delay_secs,
        "retry delay is not applied between requests"
    );
    let client = build_client(config)?;
    tracing::info!(
        total = usernames.len(),
        concurrency = options.concurrency.max(1),
        "starting retry"
    );
    let outcomes = fetch_all(client, &usernames, options.concurrency).await;
    let summary = RunSummary::from_outcomes(&outcomes);
    println!(
        "retry finished: {} succeeded, {} still failing",
        summary.success, summary.failed
    );

    let records: Vec<ProfileRecord> = outcomes.iter().map(FetchOutcome::to_record).collect();
    for csv in &options.csvs {
        match tkscrape_store::overlay_successes_on_file(csv, &records) {
            Ok(report) => println!(
                "{}: updated {} rows, {}/{} successful ({:.1}%)",
                csv.display(),
                report.updated,
                report.success,
                report.total,
                report.success_rate()
            ),
            Err(e) if e.is_not_found() => println!("skipping missing CSV {}", csv.display()),
            Err(e) => return Err(e).with_context(|| format!("failed to update {}", csv.display())),
        }
    }

    let still_failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| !o.is_success())
        .map(FetchOutcome::username)
        .collect();
    if still_failed.is_empty() {
        println!("all retried usernames succeeded");
    } else {
        tkscrape_store::write_lines(&options.still_failed, &still_failed).with_context(|| {
            format!("failed to write {}", options.still_failed.display())
        })?;
        println!(
            "{} usernames still failing, written to {}",
            still_failed.len(),
            options.still_failed.display()
        );
    }

    Ok(summary)
}
