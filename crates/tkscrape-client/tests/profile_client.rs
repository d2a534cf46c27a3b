//! Integration tests for `ProfileClient` using wiremock HTTP mocks.

use serde_json::json;
use tkscrape_client::{FetchError, ProfileClient};
use tkscrape_core::ProfileQuery;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_PATH: &str = "/api/v1/tiktok/app/v3/handler_user_profile";

fn test_client(base_url: &str) -> ProfileClient {
    ProfileClient::with_base_url("test-token", 5, "tkscrape-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn profile_body(unique_id: &str) -> serde_json::Value {
    json!({
        "code": 200,
        "message": "Request successful.",
        "data": {
            "user": {
                "unique_id": unique_id,
                "nickname": "Alice",
                "uid": "6812345678901234567",
                "sec_uid": "MS4wLjABAAAA",
                "follower_count": 1200,
                "aweme_count": 42,
                "verification_type": 1,
                "avatar_larger": { "url_list": ["https://cdn.example/a.jpg"] }
            }
        }
    })
}

#[tokio::test]
async fn fetch_username_returns_parsed_profile() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(query_param("unique_id", "alice"))
        .and(query_param("sec_user_id", ""))
        .and(query_param("user_id", ""))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("alice")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let fetched = client
        .fetch_username("alice")
        .await
        .expect("should parse profile");

    assert_eq!(fetched.user.unique_id, "alice");
    assert_eq!(fetched.user.follower_count, 1200);
    assert_eq!(fetched.raw["code"], 200);
}

#[tokio::test]
async fn leading_at_is_stripped_from_username() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(query_param("unique_id", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("alice")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .fetch_username("@alice")
        .await
        .expect("should parse profile");
}

#[tokio::test]
async fn all_supplied_identifiers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(query_param("unique_id", "alice"))
        .and(query_param("sec_user_id", "MS4wLjABAAAA"))
        .and(query_param("user_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("alice")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = ProfileQuery::by_username("alice")
        .with_sec_user_id("MS4wLjABAAAA")
        .with_user_id("42");
    client.fetch_profile(&query).await.expect("should succeed");
}

#[tokio::test]
async fn empty_query_is_rejected_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body("x")))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_profile(&ProfileQuery::default())
        .await
        .expect_err("empty query must fail");
    assert!(matches!(err, FetchError::MissingIdentifier), "got: {err:?}");
}

#[tokio::test]
async fn non_200_api_code_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 400, "message": "user not exist", "data": null})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_username("ghost").await.expect_err("should fail");
    match err {
        FetchError::Api { code, message } => {
            assert_eq!(code, 400);
            assert_eq!(message, "user not exist");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn not_found_status_is_http_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_username("bob").await.expect_err("should fail");
    assert!(
        matches!(err, FetchError::HttpStatus { status: 404, .. }),
        "got: {err:?}"
    );
    assert_eq!(err.scrape_status().as_str(), "failed");
}

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": {"code": 401, "message": "Invalid token"}})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_username("bob").await.expect_err("should fail");
    assert_eq!(err.to_string(), "HTTP 401: Unauthorized (Invalid token)");
}

#[tokio::test]
async fn malformed_json_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_username("bob").await.expect_err("should fail");
    assert!(matches!(err, FetchError::Deserialize { .. }), "got: {err:?}");
    assert_eq!(err.scrape_status().as_str(), "error");
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    // Nothing listens on port 1.
    let client = test_client("http://127.0.0.1:1");
    let err = client.fetch_username("bob").await.expect_err("should fail");
    assert!(matches!(err, FetchError::Http(_)), "got: {err:?}");
}

#[tokio::test]
async fn single_attempt_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_username("bob").await.expect_err("should fail");
    assert!(matches!(err, FetchError::HttpStatus { status: 503, .. }));
}
