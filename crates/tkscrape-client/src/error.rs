use thiserror::Error;
use tkscrape_core::ScrapeStatus;

/// Errors returned by the profile API client.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or timeout failure from the underlying HTTP client.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// 2xx transport, but the envelope `code` was not 200.
    #[error("API error (code={code}): {message}")]
    Api { code: i64, message: String },

    /// The body was not JSON, or not the expected envelope shape.
    #[error("malformed response for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("at least one of unique_id, sec_user_id or user_id is required")]
    MissingIdentifier,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl FetchError {
    /// Status recorded in the CSV for this failure.
    ///
    /// Answers the server gave (bad status, API error code) are `failed`;
    /// requests that never produced an interpretable answer are `error`.
    #[must_use]
    pub fn scrape_status(&self) -> ScrapeStatus {
        match self {
            FetchError::HttpStatus { .. }
            | FetchError::Api { .. }
            | FetchError::MissingIdentifier
            | FetchError::InvalidBaseUrl { .. } => ScrapeStatus::Failed,
            FetchError::Http(_) | FetchError::Deserialize { .. } => ScrapeStatus::Error,
        }
    }
}
