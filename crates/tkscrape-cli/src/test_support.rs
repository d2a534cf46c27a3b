use std::path::Path;

use tkscrape_core::AppConfig;

pub(crate) const PROFILE_PATH: &str = "/api/v1/tiktok/app/v3/handler_user_profile";

/// Config pointing at `base_url` with every path under `dir`.
pub(crate) fn test_config(base_url: &str, dir: &Path) -> AppConfig {
    AppConfig {
        api_base_url: base_url.to_string(),
        api_token: Some("test-token".to_string()),
        log_level: "info".to_string(),
        user_agent: "tkscrape-test/0.1".to_string(),
        concurrency: 2,
        request_timeout_secs: 5,
        retry_delay_secs: 1,
        max_users: None,
        input_list: dir.join("users.txt"),
        output_csv: dir.join("out/users.csv"),
        log_file: dir.join("scrape.log"),
        progress_interval_secs: 2,
        progress_fallback_total: 5339,
    }
}

/// A successful envelope for `unique_id`.
pub(crate) fn profile_body(unique_id: &str) -> serde_json::Value {
    serde_json::json!({
        "code": 200,
        "message": "Request successful.",
        "data": { "user": { "unique_id": unique_id, "follower_count": 1 } }
    })
}
