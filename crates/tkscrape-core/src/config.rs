use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, DEFAULT_API_BASE_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric setting cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric setting cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let api_base_url = or_default("TKSCRAPE_API_BASE_URL", DEFAULT_API_BASE_URL);
    let api_token = lookup("TKSCRAPE_API_TOKEN").ok().filter(|t| !t.is_empty());
    let log_level = or_default("TKSCRAPE_LOG_LEVEL", "info");
    let user_agent = or_default("TKSCRAPE_USER_AGENT", "tkscrape/0.1 (profile-metadata)");

    let concurrency = parse_value::<usize>(
        "TKSCRAPE_CONCURRENCY",
        &or_default("TKSCRAPE_CONCURRENCY", "10"),
    )?;
    let request_timeout_secs = parse_value::<u64>(
        "TKSCRAPE_REQUEST_TIMEOUT_SECS",
        &or_default("TKSCRAPE_REQUEST_TIMEOUT_SECS", "60"),
    )?;
    let retry_delay_secs = parse_value::<u64>(
        "TKSCRAPE_RETRY_DELAY_SECS",
        &or_default("TKSCRAPE_RETRY_DELAY_SECS", "1"),
    )?;
    let max_users = match lookup("TKSCRAPE_MAX_USERS") {
        Ok(raw) if !raw.trim().is_empty() => {
            Some(parse_value::<usize>("TKSCRAPE_MAX_USERS", &raw)?)
        }
        _ => None,
    };

    let input_list = PathBuf::from(or_default("TKSCRAPE_INPUT_LIST", "data/users.txt"));
    let output_csv = PathBuf::from(or_default("TKSCRAPE_OUTPUT_CSV", "output/users.csv"));
    let log_file = PathBuf::from(or_default("TKSCRAPE_LOG_FILE", "logs/scrape.log"));

    let progress_interval_secs = parse_value::<u64>(
        "TKSCRAPE_PROGRESS_INTERVAL_SECS",
        &or_default("TKSCRAPE_PROGRESS_INTERVAL_SECS", "2"),
    )?;
    let progress_fallback_total = parse_value::<u64>(
        "TKSCRAPE_PROGRESS_FALLBACK_TOTAL",
        &or_default("TKSCRAPE_PROGRESS_FALLBACK_TOTAL", "5339"),
    )?;

    Ok(AppConfig {
        api_base_url,
        api_token,
        log_level,
        user_agent,
        concurrency,
        request_timeout_secs,
        retry_delay_secs,
        max_users,
        input_list,
        output_csv,
        log_file,
        progress_interval_secs,
        progress_fallback_total,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}
