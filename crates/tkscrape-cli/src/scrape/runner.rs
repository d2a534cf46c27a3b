//! Bounded-concurrency fan-out over a list of usernames.
//!
//! Every username becomes its own spawned task that holds a limiter permit
//! only while its request is in flight. Results are collected by position so
//! the returned outcomes line up with the input regardless of completion
//! order.
//!
//! Progress markers are numbered in admission order, not input order:
//! tasks reach the limiter in whatever order the runtime polls them, and the
//! monitor only trusts the most recent `[n/total]` line.

use std::future::Future;
use std::sync::Arc;

use tkscrape_client::{ConcurrencyLimiter, FetchError, FetchOutcome, FetchedProfile};
use tokio::sync::Mutex;
use tracing::instrument::WithSubscriber;

use super::now_stamp;

/// Numbers admitted fetches. The count is bumped and logged under one lock, so
/// markers in the log strictly increase and the last one is `[total/total]`.
struct ProgressCounter {
    admitted: Mutex<usize>,
    total: usize,
}

impl ProgressCounter {
    fn new(total: usize) -> Self {
        Self {
            admitted: Mutex::new(0),
            total,
        }
    }

    async fn advance(&self, username: &str) {
        let mut admitted = self.admitted.lock().await;
        *admitted += 1;
        tracing::info!("[{}/{}] fetching @{username}", *admitted, self.total);
    }
}

/// Fetches every username through `fetch`, at most `limiter.capacity()` at a
/// time, and returns one outcome per username in input order.
///
/// A fetch that errors or a task that panics becomes a failure outcome for
/// that username only.
pub(crate) async fn run_batch<F, Fut>(
    usernames: &[String],
    limiter: &ConcurrencyLimiter,
    fetch: F,
) -> Vec<FetchOutcome>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FetchedProfile, FetchError>> + Send + 'static,
{
    let progress = Arc::new(ProgressCounter::new(usernames.len()));
    let fetch = Arc::new(fetch);

    let handles: Vec<_> = usernames
        .iter()
        .map(|username| {
            let fetch = Arc::clone(&fetch);
            let progress = Arc::clone(&progress);
            let limiter = limiter.clone();
            let username = username.clone();
            let task = async move {
                let result = match limiter.acquire().await {
                    Ok(_permit) => {
                        progress.advance(&username).await;
                        fetch(username.clone()).await
                    }
                    Err(e) => {
                        return FetchOutcome::error(
                            &username,
                            format!("limiter closed: {e}"),
                            now_stamp(),
                        );
                    }
                };
                let outcome = FetchOutcome::from_result(&username, result, now_stamp());
                log_outcome(&outcome);
                outcome
            };
            tokio::spawn(task.with_current_subscriber())
        })
        .collect();

    futures::future::join_all(handles)
        .await
        .into_iter()
        .zip(usernames)
        .map(|(joined, username)| {
            joined.unwrap_or_else(|e| {
                tracing::error!(username = %username, error = %e, "fetch task failed");
                FetchOutcome::error(username, format!("task failed: {e}"), now_stamp())
            })
        })
        .collect()
}

fn log_outcome(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Success {
            username, profile, ..
        } => tracing::info!(
            username = %username,
            followers = profile.follower_count,
            videos = profile.aweme_count,
            "profile fetched"
        ),
        FetchOutcome::Failure {
            username,
            status,
            message,
            ..
        } => tracing::warn!(
            username = %username,
            status = %status,
            error = %message,
            "profile fetch failed"
        ),
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
