//! End-to-end submission tests against a mock upstream.

mod common;

use common::{relay_config, MockUpstream, RunningRelay};
use form_relay_sdk::RelayClient;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_successful_submission_is_relayed() {
    let upstream = MockUpstream::start(200, r#"{"id":"xyz"}"#).await;
    let relay = RunningRelay::start(relay_config(Some(&upstream.url))).await;
    let client = RelayClient::new(&relay.url());

    let (status, body) = client.submit("Jane O'Brien", "  Jane@Example.com ").await.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(body.success);
    assert_eq!(body.message, "Form submitted successfully! Your automation has been triggered.");
    assert_eq!(body.submission_id.as_deref(), Some("xyz"));

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);

    let sent = &requests[0];
    assert_eq!(sent.headers["authorization"], "Bearer test-token");
    assert_eq!(sent.headers["user-agent"], "FormProxy/1.0");
    assert_eq!(
        sent.body["formData"],
        json!({"fullName": "Jane O'Brien", "email": "jane@example.com"})
    );
    assert_eq!(sent.body["source"], "web-form");
    assert!(sent.body["submissionTime"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_missing_upstream_id_gets_fallback() {
    let upstream = MockUpstream::start(200, r#"{"ok":true}"#).await;
    let relay = RunningRelay::start(relay_config(Some(&upstream.url))).await;

    let (status, body) = RelayClient::new(&relay.url())
        .submit("Ada Lovelace", "ada@example.com")
        .await
        .unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(body.submission_id.unwrap().starts_with("sub_"));
}

#[tokio::test]
async fn test_upstream_failure_is_generic() {
    let upstream = MockUpstream::start(500, "stack trace with secrets").await;
    let relay = RunningRelay::start(relay_config(Some(&upstream.url))).await;

    let (status, body) = RelayClient::new(&relay.url())
        .submit("Jane Doe", "jane@example.com")
        .await
        .unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.success);
    assert_eq!(body.message, "Failed to process your request. Please try again later.");
    assert!(!body.message.contains("secrets"));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_upstream() {
    let upstream = MockUpstream::start(200, r#"{"id":"never"}"#).await;
    let relay = RunningRelay::start(relay_config(Some(&upstream.url))).await;

    let (status, body) = RelayClient::new(&relay.url())
        .submit("Jane Doe", "not-an-email")
        .await
        .unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.message, "Please enter a valid email address.");
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_sixth_submission_is_rate_limited() {
    let upstream = MockUpstream::start(200, r#"{"id":"abc"}"#).await;
    let relay = RunningRelay::start(relay_config(Some(&upstream.url))).await;
    let client = RelayClient::new(&relay.url());

    for _ in 0..5 {
        let (status, _) = client.submit("Jane Doe", "jane@example.com").await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = client.submit("Jane Doe", "jane@example.com").await.unwrap();
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(!body.success);
    let retry_after = body.retry_after.unwrap();
    assert!((1..=60).contains(&retry_after));
    assert_eq!(
        body.message,
        format!("Too many requests. Please try again in {} seconds.", retry_after)
    );
    assert_eq!(upstream.requests().len(), 5);
}

#[tokio::test]
async fn test_forwarded_clients_are_limited_separately() {
    let upstream = MockUpstream::start(200, r#"{"id":"abc"}"#).await;
    let mut config = relay_config(Some(&upstream.url));
    config.rate_limit.max_requests = 1;
    let relay = RunningRelay::start(config).await;

    let http = reqwest::Client::new();
    let submit = |ip: &'static str| {
        http.post(format!("{}/api/submit-form", relay.url()))
            .header("x-forwarded-for", ip)
            .json(&json!({"fullName": "Jane Doe", "email": "jane@example.com"}))
            .send()
    };

    assert_eq!(submit("203.0.113.1").await.unwrap().status(), StatusCode::OK);
    assert_eq!(submit("203.0.113.2").await.unwrap().status(), StatusCode::OK);
    assert_eq!(
        submit("203.0.113.1").await.unwrap().status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn test_health_via_sdk() {
    let relay = RunningRelay::start(relay_config(None)).await;

    let health = RelayClient::new(&relay.url()).health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert!(!health.timestamp.is_empty());
}

#[tokio::test]
async fn test_debug_config_when_enabled() {
    let mut config = relay_config(Some("https://hooks.example.com/automation/form"));
    config.debug.expose_config = true;
    config.cors.allowed_origin = "https://forms.example.com".into();
    let relay = RunningRelay::start(config).await;

    let report: serde_json::Value = reqwest::get(format!("{}/debug/config", relay.url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(report["hasUpstreamUrl"], true);
    assert_eq!(report["hasUpstreamToken"], true);
    assert_eq!(report["allowedOrigin"], "https://forms.example.com");
    assert!(!report.to_string().contains("test-token"));
}
