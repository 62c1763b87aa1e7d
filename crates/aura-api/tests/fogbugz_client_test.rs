#![allow(clippy::unwrap_used)]
// Integration tests for `FogBugzClient` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aura_api::fogbugz::FogBugzClient;
use aura_api::{Error, TransportConfig};

async fn setup() -> (MockServer, FogBugzClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = FogBugzClient::new(
        base_url,
        "grace@example.com",
        SecretString::from("hunter2".to_string()),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

async fn mount_logon(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/logon"))
        .and(body_partial_json(json!({ "email": "grace@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "token": "tok-123" },
            "errors": []
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_logon_returns_token() {
    let (server, client) = setup().await;
    mount_logon(&server).await;

    let token = client.logon().await.unwrap();
    assert_eq!(token.expose_secret(), "tok-123");
}

#[tokio::test]
async fn test_logon_errors_are_authentication_failures() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/logon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {},
            "errors": [{ "message": "Incorrect password or username", "code": 1 }]
        })))
        .mount(&server)
        .await;

    let err = client.logon().await.unwrap_err();
    assert!(
        matches!(err, Error::Authentication { ref message } if message.contains("Incorrect")),
        "expected Authentication error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_view_person() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/viewPerson"))
        .and(body_partial_json(json!({ "token": "tok-123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "person": { "ixPerson": 3, "sFullName": "Grace Hopper" } },
            "errors": []
        })))
        .mount(&server)
        .await;

    let token = SecretString::from("tok-123".to_string());
    let person = client.view_person(&token).await.unwrap().unwrap();
    assert_eq!(person.full_name.as_deref(), Some("Grace Hopper"));
}

#[tokio::test]
async fn test_assigned_cases() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_partial_json(json!({
            "token": "tok-123",
            "q": "assignedto:me status:active",
            "max": 200
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cases": [{
                "ixBug": 4711,
                "sTitle": "Printer on fire",
                "sStatus": "Active",
                "sCategory": "Bug",
                "sPriority": "1 - Must Fix",
                "sProject": "Ops",
                "sArea": "Hardware",
                "dtLastUpdated": "2024-01-15T10:30:00Z",
                "tags": ["hardware", "urgent", "fire"],
                "fOpen": true
            }] },
            "errors": []
        })))
        .mount(&server)
        .await;

    let token = SecretString::from("tok-123".to_string());
    let cases = client.assigned_cases(&token).await.unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].id, 4711);
    let expected = format!("{}/f/cases/4711", server.uri());
    assert_eq!(cases[0].web_url.as_deref(), Some(expected.as_str()));
}

#[tokio::test]
async fn test_error_envelope_on_search() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {},
            "errors": [{ "message": "Not logged in" }, { "message": "Token expired" }]
        })))
        .mount(&server)
        .await;

    let token = SecretString::from("stale".to_string());
    let err = client.assigned_cases(&token).await.unwrap_err();
    assert_eq!(err.to_string(), "FogBugz error: Not logged in; Token expired");
}
