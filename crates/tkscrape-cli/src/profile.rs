//! `profile` command: single lookup with a readable summary.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tkscrape_client::UserProfile;
use tkscrape_core::{AppConfig, ProfileQuery, ProfileRecord};

use crate::scrape::build_client;

/// Builds the lookup query from whichever identifiers were given.
pub(crate) fn build_query(
    username: Option<&str>,
    sec_user_id: Option<&str>,
    user_id: Option<&str>,
) -> anyhow::Result<ProfileQuery> {
    let mut query = ProfileQuery::by_username(username.unwrap_or_default());
    if let Some(sec) = sec_user_id.map(str::trim).filter(|s| !s.is_empty()) {
        query = query.with_sec_user_id(sec);
    }
    if let Some(id) = user_id.map(str::trim).filter(|s| !s.is_empty()) {
        query = query.with_user_id(id);
    }
    if query.is_empty() {
        anyhow::bail!("give a username, --sec-user-id or --user-id");
    }
    Ok(query)
}

fn shorten(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let head: String = value.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

/// Multi-line human summary of a resolved profile.
pub(crate) fn format_summary(user: &UserProfile) -> String {
    let mut lines = vec![
        format!("{} (@{})", user.nickname, user.unique_id),
        format!("  uid:        {}", user.uid),
        format!("  sec_uid:    {}", shorten(&user.sec_uid, 40)),
        format!("  followers:  {}", user.follower_count),
        format!("  following:  {}", user.following_count),
        format!("  likes:      {}", user.total_favorited),
        format!("  videos:     {}", user.aweme_count),
        format!(
            "  verified:   {}",
            if user.is_verified() { "yes" } else { "no" }
        ),
    ];
    if !user.signature.is_empty() {
        let bio = user.signature.replace('\n', " ");
        lines.push(format!("  bio:        {}", shorten(&bio, 100)));
    }
    for (label, value) in [
        ("email", &user.bio_email),
        ("category", &user.category),
        ("instagram", &user.ins_id),
        ("youtube", &user.youtube_channel_title),
        ("twitter", &user.twitter_name),
    ] {
        if !value.is_empty() {
            let label = format!("{label}:");
            lines.push(format!("  {label:<11} {value}"));
        }
    }
    if !user.avatar_url().is_empty() {
        lines.push(format!("  avatar:     {}", shorten(user.avatar_url(), 80)));
    }
    lines.push(format!(
        "  profile:    {}",
        ProfileRecord::profile_url_for(&user.unique_id)
    ));
    lines.join("\n")
}

/// Writes `raw` pretty-printed to `{dir}/{name}_{YYYYmmdd_HHMMSS}.json`.
pub(crate) fn save_raw_json(
    dir: &Path,
    name: &str,
    raw: &serde_json::Value,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{name}_{stamp}.json"));
    let body = serde_json::to_string_pretty(raw)?;
    std::fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

pub(crate) async fn run_profile(
    config: &AppConfig,
    query: &ProfileQuery,
    save_json: Option<&Path>,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    if let Some(kind) = query.primary() {
        tracing::info!(target_id = %query.label(), resolved_by = %kind, "looking up profile");
    }

    let fetched = client
        .fetch_profile(query)
        .await
        .with_context(|| format!("lookup failed for {}", query.label()))?;
    println!("{}", format_summary(&fetched.user));

    if let Some(dir) = save_json {
        let name = Some(fetched.user.unique_id.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| query.unique_id.clone())
            .unwrap_or_else(|| "profile".to_string());
        let path = save_raw_json(dir, &name, &fetched.raw)?;
        println!("raw response saved to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tkscrape_core::IdentifierKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_support::{profile_body, test_config, PROFILE_PATH};

    #[test]
    fn query_needs_some_identifier() {
        assert!(build_query(None, None, None).is_err());
        assert!(build_query(Some("  @ "), Some(""), None).is_err());
    }

    #[test]
    fn query_strips_at_and_prefers_sec_id() {
        let query = build_query(Some("@alice"), Some("MS4w"), None).unwrap();
        assert_eq!(query.unique_id.as_deref(), Some("alice"));
        assert_eq!(query.primary(), Some(IdentifierKind::SecUserId));
    }

    #[test]
    fn summary_lists_counts_and_profile_url() {
        let user = UserProfile {
            unique_id: "alice".to_string(),
            nickname: "Alice".to_string(),
            follower_count: 1200,
            verification_type: 1,
            signature: "hi\nthere".to_string(),
            ..UserProfile::default()
        };
        let text = format_summary(&user);
        assert!(text.starts_with("Alice (@alice)"));
        assert!(text.contains("followers:  1200"));
        assert!(text.contains("verified:   yes"));
        assert!(text.contains("bio:        hi there"));
        assert!(text.ends_with("https://www.tiktok.com/@alice"));
        assert!(!text.contains("email:"));
    }

    #[test]
    fn summary_includes_optional_fields_when_present() {
        let user = UserProfile {
            unique_id: "bob".to_string(),
            bio_email: "bob@example.com".to_string(),
            ins_id: "bob.ig".to_string(),
            ..UserProfile::default()
        };
        let text = format_summary(&user);
        assert!(text.contains("  email:      bob@example.com"));
        assert!(text.contains("  instagram:  bob.ig"));
        assert!(!text.contains("youtube:"));
        assert!(text.contains("verified:   no"));
    }

    #[test]
    fn shorten_counts_chars_not_bytes() {
        assert_eq!(shorten("héllo", 3), "hél...");
        assert_eq!(shorten("abc", 3), "abc");
    }

    #[tokio::test]
    async fn lookup_saves_raw_json_named_after_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PROFILE_PATH))
            .and(query_param("unique_id", "alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("alice")))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), dir.path());
        let query = build_query(Some("alice"), None, None).unwrap();
        let out_dir = dir.path().join("json");
        run_profile(&config, &query, Some(&out_dir)).await.unwrap();

        let saved: Vec<_> = std::fs::read_dir(&out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].starts_with("alice_"));
        assert!(saved[0].ends_with(".json"));

        let body = std::fs::read_to_string(out_dir.join(&saved[0])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["data"]["user"]["unique_id"], "alice");
    }

    #[tokio::test]
    async fn api_error_surfaces_as_command_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PROFILE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 400,
                "message": "user not found"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), dir.path());
        let query = build_query(Some("ghost"), None, None).unwrap();
        let err = run_profile(&config, &query, None).await.unwrap_err();
        assert!(format!("{err:#}").contains("user not found"));
    }
}
