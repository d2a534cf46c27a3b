//! `scrape` command: URL list in, results CSV out.

mod runner;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tkscrape_client::{ConcurrencyLimiter, FetchOutcome, ProfileClient};
use tkscrape_core::{parse_input_lines, AppConfig, ProfileRecord, SCRAPE_TIME_FORMAT};

pub(crate) use runner::run_batch;

#[derive(Debug, Clone)]
pub(crate) struct ScrapeOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_users: Option<usize>,
    pub concurrency: usize,
}

/// Counts printed at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

impl RunSummary {
    pub(crate) fn from_outcomes(outcomes: &[FetchOutcome]) -> Self {
        let success = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            total: outcomes.len(),
            success,
            failed: outcomes.len() - success,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.success as f64 / self.total as f64 * 100.0
        }
    }
}

/// Local wall-clock time in the CSV `scrape_time` format.
pub(crate) fn now_stamp() -> String {
    chrono::Local::now().format(SCRAPE_TIME_FORMAT).to_string()
}

/// Builds the shared API client from config.
pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<Arc<ProfileClient>> {
    let token = config.require_api_token()?;
    let client = ProfileClient::with_base_url(
        token,
        config.request_timeout_secs,
        &config.user_agent,
        &config.api_base_url,
    )?;
    Ok(Arc::new(client))
}

/// Runs `usernames` through the batch runner against the configured API.
pub(crate) async fn fetch_all(
    client: Arc<ProfileClient>,
    usernames: &[String],
    concurrency: usize,
) -> Vec<FetchOutcome> {
    let limiter = ConcurrencyLimiter::new(concurrency);
    run_batch(usernames, &limiter, move |username| {
        let client = Arc::clone(&client);
        async move { client.fetch_username(&username).await }
    })
    .await
}

pub(crate) async fn run_scrape(
    config: &AppConfig,
    options: &ScrapeOptions,
) -> anyhow::Result<RunSummary> {
    let lines = tkscrape_store::read_lines(&options.input)
        .with_context(|| format!("failed to read input list {}", options.input.display()))?;
    let mut usernames = parse_input_lines(lines.iter().map(String::as_str));
    let candidates = lines
        .iter()
        .map(|l| l.as_str().trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .count();
    if candidates > usernames.len() {
        tracing::debug!(
            dropped = candidates - usernames.len(),
            "lines without a @handle skipped"
        );
    }
    tracing::info!(found = usernames.len(), input = %options.input.display(), "usernames loaded");

    if let Some(max) = options.max_users {
        if usernames.len() > max {
            usernames.truncate(max);
            tracing::info!(max, "limited to first {max} usernames");
        }
    }

    let client = build_client(config)?;
    tracing::info!(
        total = usernames.len(),
        concurrency = options.concurrency.max(1),
        "starting scrape"
    );
    let started = std::time::Instant::now();
    let outcomes = fetch_all(client, &usernames, options.concurrency).await;

    let records: Vec<ProfileRecord> = outcomes.iter().map(FetchOutcome::to_record).collect();
    tkscrape_store::write_records(&options.output, &records)
        .with_context(|| format!("failed to write {}", options.output.display()))?;

    let summary = RunSummary::from_outcomes(&outcomes);
    println!("scrape complete in {:.1}s", started.elapsed().as_secs_f64());
    println!("  total:   {}", summary.total);
    println!("  success: {}", summary.success);
    println!("  failed:  {}", summary.failed);
    println!("  success rate: {:.1}%", summary.success_rate());
    println!("  output:  {}", options.output.display());

    Ok(summary)
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
