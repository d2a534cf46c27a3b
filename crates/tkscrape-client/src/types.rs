//! Response types for the `handler_user_profile` endpoint.
//!
//! ## Observed shape
//!
//! ```json
//! { "code": 200, "message": "Request successful.", "data": { "user": { ... } } }
//! ```
//!
//! ### Numeric ids
//! `uid` is sometimes a JSON string and sometimes a bare number. Both are
//! kept as strings so large ids never lose precision.
//!
//! ### Nulls
//! Optional profile fields (`bio_email`, `category`, `signature`) come back as
//! `null` as often as they are omitted. Every field is lenient: `null`,
//! missing and wrong-typed values fall back to an empty string or `0`.
//!
//! ### Avatar
//! `avatar_larger` is an object with a `url_list` array; the first entry is
//! the canonical URL.

use serde::{Deserialize, Serialize};

/// Top-level envelope returned by the profile endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    /// Application status; 200 means the profile was resolved.
    #[serde(default, deserialize_with = "lenient::optional_i64")]
    pub code: Option<i64>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,

    #[serde(default)]
    pub data: Option<ProfileData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// The profile attributes persisted per username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(deserialize_with = "lenient::string")]
    pub unique_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nickname: String,
    #[serde(deserialize_with = "lenient::string")]
    pub uid: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sec_uid: String,
    #[serde(deserialize_with = "lenient::string")]
    pub signature: String,
    #[serde(deserialize_with = "lenient::i64")]
    pub follower_count: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub following_count: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub total_favorited: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub aweme_count: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub visible_videos_count: i64,
    #[serde(deserialize_with = "lenient::i64")]
    pub verification_type: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub bio_email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(deserialize_with = "lenient::i64")]
    pub account_type: i64,
    pub avatar_larger: Option<ImageUrls>,
    #[serde(deserialize_with = "lenient::string")]
    pub ins_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub youtube_channel_title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub twitter_name: String,
}

impl UserProfile {
    /// First avatar URL, or an empty string.
    #[must_use]
    pub fn avatar_url(&self) -> &str {
        self.avatar_larger
            .as_ref()
            .and_then(|a| a.url_list.first())
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verification_type > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    #[serde(default)]
    pub url_list: Vec<String>,
}

/// A successfully resolved profile plus the raw body it came from.
#[derive(Debug, Clone)]
pub struct FetchedProfile {
    pub user: UserProfile,
    pub raw: serde_json::Value,
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    pub(super) fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_i64(&Value::deserialize(deserializer)?))
    }

    pub(super) fn i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_i64(&Value::deserialize(deserializer)?).unwrap_or_default())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn as_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}
