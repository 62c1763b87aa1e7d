#![allow(clippy::unwrap_used)]
// Integration tests for `GitHubClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aura_api::github::GitHubClient;
use aura_api::{Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GitHubClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let token = SecretString::from("gho_test".to_string());
    let client = GitHubClient::new(base_url, &token, &TransportConfig::default()).unwrap();
    (server, client)
}

fn issue(id: u64, number: u64, is_pr: bool) -> serde_json::Value {
    let mut value = json!({
        "id": id,
        "number": number,
        "title": format!("Item {number}"),
        "state": "open",
        "html_url": format!("https://github.com/acme/widgets/issues/{number}"),
        "user": { "login": "octocat", "id": 1 },
        "labels": [{ "name": "bug", "color": "d73a4a" }],
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "repository_url": "https://api.github.com/repos/acme/widgets"
    });
    if is_pr {
        value["pull_request"] = json!({ "url": "https://api.github.com/repos/acme/widgets/pulls/1" });
    }
    value
}

// ── Issues ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_assigned_issues_filters_pull_requests() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("filter", "assigned"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer gho_test"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([issue(1, 10, false), issue(2, 11, true)])),
        )
        .mount(&server)
        .await;

    let issues = client.assigned_issues().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].number, 10);
    assert_eq!(issues[0].repository(), Some("acme/widgets"));
}

#[tokio::test]
async fn test_assigned_issues_walks_full_pages() {
    let (server, client) = setup().await;

    let full_page: Vec<_> = (0..100).map(|n| issue(n, n, false)).collect();
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(full_page)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([issue(500, 500, false)])))
        .mount(&server)
        .await;

    let issues = client.assigned_issues().await.unwrap();
    assert_eq!(issues.len(), 101);
}

#[tokio::test]
async fn test_status_error_carries_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/issues"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API rate limit exceeded"))
        .mount(&server)
        .await;

    let err = client.assigned_issues().await.unwrap_err();
    assert!(
        matches!(err, Error::Status { status: 403, .. }),
        "expected Status error, got: {err:?}"
    );
    assert_eq!(err.to_string(), "GitHub API error 403: API rate limit exceeded");
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&server)
        .await;

    let err = client.assigned_issues().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}

// ── Pull requests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_involved_pull_requests_uses_search() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", "type:pr is:open involves:octocat"))
        .and(query_param("sort", "updated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "incomplete_results": false,
            "items": [issue(9, 42, true)]
        })))
        .mount(&server)
        .await;

    let prs = client.involved_pull_requests("octocat").await.unwrap();
    assert_eq!(prs.len(), 1);
    assert!(prs[0].is_pull_request());
    assert_eq!(prs[0].labels[0].color.as_deref(), Some("d73a4a"));
}

#[tokio::test]
async fn test_current_user() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "id": 583231,
            "name": "The Octocat"
        })))
        .mount(&server)
        .await;

    let user = client.current_user().await.unwrap();
    assert_eq!(user.login, "octocat");
}
