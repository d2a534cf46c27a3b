//! `monitor` command: live progress bar for a scrape whose output is being
//! redirected to a log file.

mod progress;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use progress::{format_duration, read_progress, ProgressSnapshot};

#[derive(Debug, Clone)]
pub(crate) struct MonitorOptions {
    pub log_file: PathBuf,
    pub interval_secs: u64,
    pub fallback_total: u64,
}

/// How a monitoring session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonitorState {
    Complete,
    Stopped,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MonitorReport {
    pub state: MonitorState,
    pub last: ProgressSnapshot,
}

fn render(bar: &ProgressBar, snapshot: &ProgressSnapshot) {
    bar.set_length(snapshot.total);
    bar.set_position(snapshot.current.min(snapshot.total));
    let eta = snapshot
        .eta()
        .map_or_else(|| "--".to_string(), format_duration);
    bar.set_message(format!(
        "{:.1}% | {:.2}/s | ETA {eta}",
        snapshot.percent(),
        snapshot.throughput()
    ));
}

/// Re-reads `path` every `interval` until the run completes or `stop`
/// resolves.
pub(crate) async fn watch_log<S>(
    path: &Path,
    interval: Duration,
    fallback_total: u64,
    bar: &ProgressBar,
    stop: S,
) -> MonitorReport
where
    S: Future<Output = ()>,
{
    let started = Instant::now();
    let observe = || {
        let (current, total) = read_progress(path, fallback_total);
        ProgressSnapshot {
            current,
            total,
            elapsed: started.elapsed(),
        }
    };
    tokio::pin!(stop);

    loop {
        let snapshot = observe();
        render(bar, &snapshot);

        if snapshot.is_complete() {
            bar.finish();
            return MonitorReport {
                state: MonitorState::Complete,
                last: snapshot,
            };
        }

        tokio::select! {
            () = &mut stop => {
                let last = observe();
                render(bar, &last);
                bar.abandon();
                return MonitorReport {
                    state: MonitorState::Stopped,
                    last,
                };
            }
            () = tokio::time::sleep(interval) => {}
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C; stop the monitor with a signal");
        std::future::pending::<()>().await;
    }
}

pub(crate) async fn run_monitor(options: &MonitorOptions) -> anyhow::Result<()> {
    if !options.log_file.exists() {
        println!(
            "log file {} not found; start a scrape with its output redirected there first",
            options.log_file.display()
        );
        return Ok(());
    }

    println!(
        "monitoring {} every {}s (Ctrl-C to stop)",
        options.log_file.display(),
        options.interval_secs.max(1)
    );
    let bar = ProgressBar::new(options.fallback_total);
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:50.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let report = watch_log(
        &options.log_file,
        Duration::from_secs(options.interval_secs.max(1)),
        options.fallback_total,
        &bar,
        ctrl_c(),
    )
    .await;

    match report.state {
        MonitorState::Complete => println!("scrape complete"),
        MonitorState::Stopped => println!("monitoring stopped"),
    }
    println!(
        "  progress:   {}/{} ({:.1}%)",
        report.last.current,
        report.last.total,
        report.last.percent()
    );
    println!("  elapsed:    {}", format_duration(report.last.elapsed));
    println!("  throughput: {:.2}/s", report.last.throughput());
    Ok(())
}
