//! The fixed 21-column row persisted to CSV for every scraped username.

use serde::{Deserialize, Serialize};

/// Column order of every CSV this workspace reads or writes.
pub const CSV_COLUMNS: [&str; 21] = [
    "username",
    "unique_id",
    "nickname",
    "uid",
    "sec_uid",
    "signature",
    "follower_count",
    "following_count",
    "total_favorited",
    "aweme_count",
    "visible_videos_count",
    "verification_type",
    "verified",
    "bio_email",
    "category",
    "account_type",
    "avatar_larger_url",
    "profile_url",
    "scrape_time",
    "scrape_status",
    "error_message",
];

/// Format of the `scrape_time` column.
pub const SCRAPE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome class recorded in the `scrape_status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStatus {
    Success,
    /// The API or HTTP layer answered, but not with a profile.
    Failed,
    /// The request never produced an interpretable answer.
    Error,
}

impl ScrapeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeStatus::Success => "success",
            ScrapeStatus::Failed => "failed",
            ScrapeStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One CSV row. Field order is the column order.
///
/// Numeric columns are `None` (written as an empty cell) on failure rows and
/// when a legacy file carries a non-numeric value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    pub username: String,
    pub unique_id: String,
    pub nickname: String,
    pub uid: String,
    pub sec_uid: String,
    pub signature: String,
    #[serde(deserialize_with = "csv_option::deserialize")]
    pub follower_count: Option<i64>,
    #[serde(deserialize_with = "csv_option::deserialize")]
    pub following_count: Option<i64>,
    #[serde(deserialize_with = "csv_option::deserialize")]
    pub total_favorited: Option<i64>,
    #[serde(deserialize_with = "csv_option::deserialize")]
    pub aweme_count: Option<i64>,
    #[serde(deserialize_with = "csv_option::deserialize")]
    pub visible_videos_count: Option<i64>,
    #[serde(deserialize_with = "csv_option::deserialize")]
    pub verification_type: Option<i64>,
    pub verified: String,
    pub bio_email: String,
    pub category: String,
    #[serde(deserialize_with = "csv_option::deserialize")]
    pub account_type: Option<i64>,
    pub avatar_larger_url: String,
    pub profile_url: String,
    pub scrape_time: String,
    pub scrape_status: String,
    pub error_message: String,
}

impl ProfileRecord {
    /// Builds a failure row: only identity, time, status and message are set.
    #[must_use]
    pub fn failure(
        username: &str,
        status: ScrapeStatus,
        message: &str,
        scrape_time: &str,
    ) -> Self {
        let message = if message.trim().is_empty() {
            "Unknown error"
        } else {
            message
        };
        Self {
            username: username.to_string(),
            scrape_time: scrape_time.to_string(),
            scrape_status: status.as_str().to_string(),
            error_message: message.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn profile_url_for(username: &str) -> String {
        format!("https://www.tiktok.com/@{username}")
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.scrape_status == ScrapeStatus::Success.as_str()
    }
}

/// Lenient numeric cells: empty or unparseable values become `None` instead of
/// failing the whole row.
mod csv_option {
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(float_to_i64))
        }))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn float_to_i64(v: f64) -> i64 {
        v as i64
    }
}
