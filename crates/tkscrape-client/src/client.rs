//! HTTP client for the profile metadata API.
//!
//! Wraps `reqwest` with bearer-token authentication and typed envelope
//! handling. Every call is a single attempt: transport failures, non-2xx
//! statuses and non-200 envelope codes all surface as [`FetchError`] and are
//! never retried here.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tkscrape_core::ProfileQuery;

use crate::error::FetchError;
use crate::types::{FetchedProfile, ProfileEnvelope};

const DEFAULT_BASE_URL: &str = "https://api.tikhub.io/";
const PROFILE_PATH: &str = "api/v1/tiktok/app/v3/handler_user_profile";

/// Envelope code meaning the profile was resolved.
const API_OK: i64 = 200;

/// Client for the `handler_user_profile` endpoint.
///
/// Use [`ProfileClient::new`] for production or
/// [`ProfileClient::with_base_url`] to point at a mock server in tests.
pub struct ProfileClient {
    client: Client,
    api_token: String,
    endpoint: Url,
}

impl std::fmt::Debug for ProfileClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileClient")
            .field("api_token", &"[redacted]")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl ProfileClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_token: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        Self::with_base_url(api_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`FetchError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(PROFILE_PATH))
            .map_err(|e| FetchError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_token: api_token.to_owned(),
            endpoint,
        })
    }

    /// Fetches one profile by username.
    ///
    /// # Errors
    ///
    /// See [`ProfileClient::fetch_profile`].
    pub async fn fetch_username(&self, username: &str) -> Result<FetchedProfile, FetchError> {
        self.fetch_profile(&ProfileQuery::by_username(username)).await
    }

    /// Fetches one profile. All supplied identifiers are sent; the server
    /// resolves by sec id, then numeric id, then username.
    ///
    /// # Errors
    ///
    /// - [`FetchError::MissingIdentifier`] if the query is empty (no request is sent).
    /// - [`FetchError::Http`] on network failure or timeout.
    /// - [`FetchError::HttpStatus`] on a non-2xx status.
    /// - [`FetchError::Deserialize`] if the body is not a JSON envelope.
    /// - [`FetchError::Api`] if the envelope code is not 200.
    pub async fn fetch_profile(&self, query: &ProfileQuery) -> Result<FetchedProfile, FetchError> {
        if query.is_empty() {
            return Err(FetchError::MissingIdentifier);
        }

        let url = self.build_url(query);
        let label = query.label();
        tracing::debug!(target = %label, "requesting user profile");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                reason: http_failure_reason(status, &body),
            });
        }

        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Deserialize {
                context: label.clone(),
                source: e,
            })?;
        let envelope: ProfileEnvelope =
            serde_json::from_value(raw.clone()).map_err(|e| FetchError::Deserialize {
                context: label.clone(),
                source: e,
            })?;

        match envelope.code {
            Some(API_OK) => {}
            code => {
                let message = if envelope.message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    envelope.message
                };
                return Err(FetchError::Api {
                    code: code.unwrap_or_default(),
                    message,
                });
            }
        }

        let user = envelope.data.and_then(|d| d.user).unwrap_or_default();
        Ok(FetchedProfile { user, raw })
    }

    /// Builds the endpoint URL. All three identifier params are always
    /// present, empty when unset.
    fn build_url(&self, query: &ProfileQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("unique_id", query.unique_id.as_deref().unwrap_or_default())
            .append_pair("sec_user_id", query.sec_user_id.as_deref().unwrap_or_default())
            .append_pair("user_id", query.user_id.as_deref().unwrap_or_default());
        url
    }
}

/// Human-readable reason for a non-2xx response: the API's own message when
/// the error body carries one, else the canonical status text.
fn http_failure_reason(status: StatusCode, body: &str) -> String {
    let canonical = status.canonical_reason().unwrap_or("Unknown status");
    let api_message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let detail = v.get("detail").unwrap_or(&v);
            detail
                .get("message")
                .and_then(serde_json::Value::as_str)
                .or_else(|| detail.as_str())
                .map(str::to_owned)
        })
        .filter(|m| !m.is_empty());

    match api_message {
        Some(msg) => format!("{canonical} ({msg})"),
        None => canonical.to_string(),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
