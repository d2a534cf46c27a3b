mod lists;
mod monitor;
mod profile;
mod retry;
mod scrape;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tkscrape")]
#[command(about = "Bulk TikTok profile metadata collection")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every profile in a URL list and write the results CSV
    Scrape {
        /// Newline-delimited profile URLs (defaults to `TKSCRAPE_INPUT_LIST`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output CSV path (defaults to `TKSCRAPE_OUTPUT_CSV`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Only process the first N usernames
        #[arg(long)]
        max_users: Option<usize>,
        /// Maximum requests in flight
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Re-fetch failed usernames and patch successes into existing CSVs
    Retry {
        /// Failed-username list (plain usernames, one per line); repeatable
        #[arg(long = "failed", required = true)]
        failed: Vec<PathBuf>,
        /// CSV to update in place; repeatable
        #[arg(long = "csv", required = true)]
        csvs: Vec<PathBuf>,
        /// Where to write usernames that still fail
        #[arg(long, default_value = "still_failed_users.txt")]
        still_failed: PathBuf,
        /// Maximum requests in flight
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Look up a single profile and print a summary
    Profile {
        /// Username, with or without a leading `@`
        username: Option<String>,
        /// Secure user id (takes precedence on the server side)
        #[arg(long)]
        sec_user_id: Option<String>,
        /// Numeric user id
        #[arg(long)]
        user_id: Option<String>,
        /// Save the raw JSON response into this directory
        #[arg(long)]
        save_json: Option<PathBuf>,
    },
    /// Merge result CSVs into one, deduplicated by username
    Merge {
        /// Merged CSV path
        #[arg(long)]
        output: PathBuf,
        /// Input CSVs, in precedence order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Remove blank and duplicate lines from a list file (keeps a backup)
    Dedupe {
        /// List file to rewrite in place
        path: PathBuf,
    },
    /// Keep only http(s) lines in a URL list
    Clean {
        /// List file to rewrite in place
        path: PathBuf,
    },
    /// List usernames from a URL list that are not yet in a results CSV
    Remaining {
        /// URL list
        #[arg(long)]
        list: PathBuf,
        /// Results CSV scraped so far
        #[arg(long)]
        csv: PathBuf,
        /// Where to write the remaining usernames
        #[arg(long, default_value = "remaining_users.txt")]
        output: PathBuf,
    },
    /// Follow `[current/total]` markers in a run log and render progress
    Monitor {
        /// Log file to tail (defaults to `TKSCRAPE_LOG_FILE`)
        log_file: Option<PathBuf>,
        /// Refresh interval in seconds
        #[arg(long)]
        interval: Option<u64>,
        /// Total to assume before the first marker appears
        #[arg(long)]
        total: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = tkscrape_core::load_app_config()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    match cli.command {
        Some(Commands::Scrape {
            input,
            output,
            max_users,
            concurrency,
        }) => {
            let options = scrape::ScrapeOptions {
                input: input.unwrap_or_else(|| config.input_list.clone()),
                output: output.unwrap_or_else(|| config.output_csv.clone()),
                max_users: max_users.or(config.max_users),
                concurrency: concurrency.unwrap_or_else(|| config.effective_concurrency()),
            };
            scrape::run_scrape(&config, &options).await?;
        }
        Some(Commands::Retry {
            failed,
            csvs,
            still_failed,
            concurrency,
        }) => {
            let options = retry::RetryOptions {
                failed_lists: failed,
                csvs,
                still_failed,
                concurrency: concurrency.unwrap_or_else(|| config.effective_concurrency()),
            };
            retry::run_retry(&config, &options).await?;
        }
        Some(Commands::Profile {
            username,
            sec_user_id,
            user_id,
            save_json,
        }) => {
            let query = profile::build_query(
                username.as_deref(),
                sec_user_id.as_deref(),
                user_id.as_deref(),
            )?;
            profile::run_profile(&config, &query, save_json.as_deref()).await?;
        }
        Some(Commands::Merge { output, inputs }) => lists::run_merge(&inputs, &output)?,
        Some(Commands::Dedupe { path }) => lists::run_dedupe(&path)?,
        Some(Commands::Clean { path }) => lists::run_clean(&path)?,
        Some(Commands::Remaining { list, csv, output }) => {
            lists::run_remaining(&list, &csv, &output)?;
        }
        Some(Commands::Monitor {
            log_file,
            interval,
            total,
        }) => {
            let options = monitor::MonitorOptions {
                log_file: log_file.unwrap_or_else(|| config.log_file.clone()),
                interval_secs: interval.unwrap_or(config.progress_interval_secs),
                fallback_total: total.unwrap_or(config.progress_fallback_total),
            };
            monitor::run_monitor(&options).await?;
        }
        None => println!("no command given; run `tkscrape --help` for usage"),
    }

    Ok(())
}

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;
