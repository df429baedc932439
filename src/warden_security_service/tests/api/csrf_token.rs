use serde_json::Value;

use crate::helpers::{ALLOWED_ORIGIN, TestApp, message};

#[tokio::test]
async fn anonymous_caller_is_not_authorized() {
    let app = TestApp::new().await;

    let response = app.get_csrf_token(None).await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(message(response).await, "Not authorized");
}

#[tokio::test]
async fn invalid_session_token_is_not_authorized() {
    let app = TestApp::new().await;

    let response = app.get_csrf_token(Some("not-a-token")).await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn caller_with_read_permission_gets_a_token() {
    let app = TestApp::new().await;
    let token = app.token_for("gamma").await;

    let response = app.get_csrf_token(Some(&token)).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(!body["result"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = TestApp::new().await;
    let token = app.token_for("gamma").await;

    let response = app
        .http_client
        .get(app.url("/csrf_token/"))
        .header("cookie", format!("session={token}"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn caller_without_read_permission_is_forbidden() {
    let app = TestApp::new().await;
    let token = app.token_for("nobody").await;

    let response = app.get_csrf_token(Some(&token)).await;

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(message(response).await, "Forbidden");
}

#[tokio::test]
async fn tokens_differ_between_calls() {
    let app = TestApp::new().await;
    let token = app.token_for("gamma").await;

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let body: Value = app.get_csrf_token(Some(&token)).await.json().await.unwrap();
        tokens.push(body["result"].as_str().unwrap().to_owned());
    }

    assert_ne!(tokens[0], tokens[1]);
}

#[tokio::test]
async fn every_call_is_audited() {
    let app = TestApp::new().await;
    let token = app.token_for("gamma").await;

    app.get_csrf_token(None).await;
    app.get_csrf_token(Some(&token)).await;

    let events: Vec<_> = app
        .audit_events()
        .into_iter()
        .filter(|event| event.action == "SecurityApi.csrf_token")
        .collect();
    assert_eq!(events.len(), 2);

    assert_eq!(events[0].status, 401);
    assert_eq!(events[0].username, None);

    assert_eq!(events[1].status, 200);
    assert_eq!(events[1].username.as_deref(), Some("gamma"));
    assert_eq!(events[1].method, "GET");
    assert_eq!(events[1].path, "/api/v1/security/csrf_token/");
}

#[tokio::test]
async fn allowed_origin_gets_cors_headers() {
    let app = TestApp::new().await;
    let token = app.token_for("gamma").await;

    let response = app
        .http_client
        .get(app.url("/csrf_token/"))
        .bearer_auth(&token)
        .header("origin", ALLOWED_ORIGIN)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
}

#[tokio::test]
async fn unknown_origin_gets_no_cors_headers() {
    let app = TestApp::new().await;
    let token = app.token_for("gamma").await;

    let response = app
        .http_client
        .get(app.url("/csrf_token/"))
        .bearer_auth(&token)
        .header("origin", "http://evil.example.com")
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.headers().get("access-control-allow-origin").is_none());
}
