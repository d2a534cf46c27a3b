use std::path::PathBuf;

use crate::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.tikhub.io";
pub const API_TOKEN_VAR: &str = "TKSCRAPE_API_TOKEN";

#[derive(Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub log_level: String,
    pub user_agent: String,
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    /// Carried for compatibility with existing `.env` files. Nothing sleeps on it:
    /// failed identifiers are only re-fetched by an explicit `retry` run.
    pub retry_delay_secs: u64,
    pub max_users: Option<usize>,
    pub input_list: PathBuf,
    pub output_csv: PathBuf,
    pub log_file: PathBuf,
    pub progress_interval_secs: u64,
    pub progress_fallback_total: u64,
}

impl AppConfig {
    /// Returns the API token, or an error naming the variable to set.
    ///
    /// Only the commands that talk to the API need a token, so it is checked
    /// lazily rather than at load time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when no token is configured.
    pub fn require_api_token(&self) -> Result<&str, ConfigError> {
        self.api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(API_TOKEN_VAR.to_string()))
    }

    /// Concurrency limit clamped to at least one in-flight request.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("concurrency", &self.concurrency)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("max_users", &self.max_users)
            .field("input_list", &self.input_list)
            .field("output_csv", &self.output_csv)
            .field("log_file", &self.log_file)
            .field("progress_interval_secs", &self.progress_interval_secs)
            .field("progress_fallback_total", &self.progress_fallback_total)
            .finish()
    }
}
