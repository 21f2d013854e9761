//! Integration tests for the GitHub events client.
//!
//! A wiremock server stands in for the API so status handling, headers and
//! body decoding can be checked without network access.

use std::time::Duration;

use gh_feed::github::{GitHubClient, GitHubError};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// =============================================================================
// Test Helpers
// =============================================================================

fn client(server: &MockServer, token: Option<&str>) -> GitHubClient {
    GitHubClient::new(server.uri(), token.map(str::to_string), Duration::from_secs(5)).unwrap()
}

/// Base URL of a local port with nothing listening on it.
fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn sample_events() -> serde_json::Value {
    json!([
        {"type": "WatchEvent", "repo": {"name": "octocat/Hello-World"}, "created_at": "2024-01-01T00:00:00Z"},
        {"type": "PushEvent", "repo": {"name": "octocat/Spoon-Knife"}, "payload": {"commits": [{}]}}
    ])
}

// =============================================================================
// Success Path
// =============================================================================

#[tokio::test]
async fn test_fetch_returns_raw_events_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_events()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetched = client(&mock_server, None).fetch_events("octocat").await.unwrap();

    assert_eq!(fetched.events.len(), 2);
    assert_eq!(fetched.events[0]["type"], "WatchEvent");
    assert_eq!(fetched.events[1]["repo"]["name"], "octocat/Spoon-Knife");
    assert_eq!(fetched.rate_limit_remaining, None);
}

#[tokio::test]
async fn test_token_is_sent_as_authorization_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .and(header("authorization", "token ghp_secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetched = client(&mock_server, Some("ghp_secret"))
        .fetch_events("octocat")
        .await
        .unwrap();

    assert!(fetched.events.is_empty());
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    client(&mock_server, None).fetch_events("octocat").await.unwrap();

    let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_rate_limit_remaining_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-RateLimit-Remaining", "4")
                .set_body_json(json!([])),
        )
        .mount(&mock_server)
        .await;

    let fetched = client(&mock_server, None).fetch_events("octocat").await.unwrap();

    assert_eq!(fetched.rate_limit_remaining, Some(4));
    assert!(fetched.nearing_rate_limit());
}

// =============================================================================
// Error Statuses
// =============================================================================

#[tokio::test]
async fn test_404_is_user_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost-user/events"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server, None)
        .fetch_events("ghost-user")
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::UserNotFound { ref username } if username == "ghost-user"));
    assert_eq!(err.user_message(), "Error: User 'ghost-user' not found.");
    assert!(!err.is_connection());
}

#[tokio::test]
async fn test_403_is_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(403).insert_header("X-RateLimit-Remaining", "0"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server, None)
        .fetch_events("octocat")
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::RateLimited));
    assert_eq!(err.user_message(), "Error: Rate limit exceeded. Try again later.");
}

#[tokio::test]
async fn test_other_status_carries_code_and_reason() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server, None)
        .fetch_events("octocat")
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::Status { status: 502, .. }));
    assert_eq!(err.user_message(), "HTTP Error 502: Bad Gateway");
}

#[tokio::test]
async fn test_non_array_body_is_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "odd"})))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server, None)
        .fetch_events("octocat")
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::Json(_)));
}

#[tokio::test]
async fn test_invalid_username_makes_no_request() {
    let mock_server = MockServer::start().await;

    let err = client(&mock_server, None)
        .fetch_events("../admin")
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::InvalidUsername(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let uri = closed_port_uri();

    let client = GitHubClient::new(uri, None, Duration::from_secs(2)).unwrap();
    let err = client.fetch_events("octocat").await.unwrap_err();

    assert!(err.is_connection(), "expected connection error, got {err:?}");
    assert!(err.user_message().starts_with("Connection error:"));
}
