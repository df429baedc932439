use serde_json::Value;

use crate::helpers::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, USER_PASSWORD, message};

#[tokio::test]
async fn valid_credentials_start_a_session() {
    let app = TestApp::new().await;

    let response = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;

    assert_eq!(response.status().as_u16(), 200);
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_owned();
    let body: Value = response.json().await.unwrap();
    let token = body["access_token"].as_str().unwrap();

    assert!(cookie.starts_with(&format!("session={token}")));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn wrong_password_is_an_invalid_login() {
    let app = TestApp::new().await;

    let response = app.login(ADMIN_USERNAME, "wrong-password").await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(message(response).await, "Invalid login");
}

#[tokio::test]
async fn unknown_user_is_an_invalid_login() {
    let app = TestApp::new().await;

    let response = app.login("ghost", ADMIN_PASSWORD).await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(message(response).await, "Invalid login");
}

#[tokio::test]
async fn inactive_user_cannot_use_an_existing_session() {
    let app = TestApp::new().await;
    let token = app.token_for("gamma").await;

    app.directory
        .set_active(&warden_core::Username::parse("gamma").unwrap(), false)
        .await
        .unwrap();

    let response = app.get_csrf_token(Some(&token)).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn inactive_user_cannot_log_in() {
    let app = TestApp::new().await;
    app.directory
        .set_active(&warden_core::Username::parse("gamma").unwrap(), false)
        .await
        .unwrap();

    let response = app.login("gamma", USER_PASSWORD).await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(message(response).await, "Invalid login");
}

#[tokio::test]
async fn login_is_audited_without_a_caller() {
    let app = TestApp::new().await;

    app.login(ADMIN_USERNAME, "wrong-password").await;

    let events = app.audit_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "SecurityApi.login");
    assert_eq!(events[0].username, None);
    assert_eq!(events[0].status, 401);
    assert_eq!(events[0].path, "/api/v1/security/login/");
}

#[tokio::test]
async fn unknown_path_is_not_found_and_not_audited() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .get(app.url("/nowhere/"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 404);
    assert!(app.audit_events().is_empty());
}
