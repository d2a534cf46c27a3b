//! Conversion from fetch results to [`ProfileRecord`] CSV rows.

use tkscrape_core::{ProfileRecord, ScrapeStatus};

use crate::error::FetchError;
use crate::types::{FetchedProfile, UserProfile};

/// Result of one username's fetch within a run.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success {
        username: String,
        profile: UserProfile,
        scraped_at: String,
    },
    Failure {
        username: String,
        status: ScrapeStatus,
        message: String,
        scraped_at: String,
    },
}

impl FetchOutcome {
    /// Classifies a fetch result for `username`.
    #[must_use]
    pub fn from_result(
        username: &str,
        result: Result<FetchedProfile, FetchError>,
        scraped_at: String,
    ) -> Self {
        match result {
            Ok(fetched) => FetchOutcome::Success {
                username: username.to_string(),
                profile: fetched.user,
                scraped_at,
            },
            Err(err) => FetchOutcome::Failure {
                username: username.to_string(),
                status: err.scrape_status(),
                message: err.to_string(),
                scraped_at,
            },
        }
    }

    /// Failure outcome for work that never produced a result (e.g. the task
    /// panicked).
    #[must_use]
    pub fn error(username: &str, message: impl Into<String>, scraped_at: String) -> Self {
        FetchOutcome::Failure {
            username: username.to_string(),
            status: ScrapeStatus::Error,
            message: message.into(),
            scraped_at,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            FetchOutcome::Success { username, .. } | FetchOutcome::Failure { username, .. } => {
                username
            }
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    #[must_use]
    pub fn to_record(&self) -> ProfileRecord {
        match self {
            FetchOutcome::Success {
                username,
                profile,
                scraped_at,
            } => normalize_profile(username, profile, scraped_at),
            FetchOutcome::Failure {
                username,
                status,
                message,
                scraped_at,
            } => ProfileRecord::failure(username, *status, message, scraped_at),
        }
    }
}

/// Projects a resolved profile onto the CSV schema.
///
/// `username` is the handle that was requested, which may differ in case from
/// the `unique_id` the API reports.
#[must_use]
pub fn normalize_profile(username: &str, profile: &UserProfile, scraped_at: &str) -> ProfileRecord {
    ProfileRecord {
        username: username.to_string(),
        unique_id: profile.unique_id.clone(),
        nickname: profile.nickname.clone(),
        uid: profile.uid.clone(),
        sec_uid: profile.sec_uid.clone(),
        signature: flatten_newlines(&profile.signature),
        follower_count: Some(profile.follower_count),
        following_count: Some(profile.following_count),
        total_favorited: Some(profile.total_favorited),
        aweme_count: Some(profile.aweme_count),
        visible_videos_count: Some(profile.visible_videos_count),
        verification_type: Some(profile.verification_type),
        verified: if profile.is_verified() { "Yes" } else { "No" }.to_string(),
        bio_email: profile.bio_email.clone(),
        category: profile.category.clone(),
        account_type: Some(profile.account_type),
        avatar_larger_url: profile.avatar_url().to_string(),
        profile_url: ProfileRecord::profile_url_for(username),
        scrape_time: scraped_at.to_string(),
        scrape_status: ScrapeStatus::Success.as_str().to_string(),
        error_message: String::new(),
    }
}

fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
