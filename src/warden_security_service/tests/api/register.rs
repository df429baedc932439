use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use serde_json::{Value, json};
use warden_core::{UserDirectory, Username};

use crate::helpers::{
    ALLOWED_ORIGIN, TestApp, USER_PASSWORD, message, register_payload, test_settings,
};

fn payload(username: &str) -> Value {
    register_payload(username, &SafeEmail().fake::<String>())
}

#[tokio::test]
async fn admin_registers_a_user_who_can_log_in() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;

    let response = app.post_register(Some(&token), &payload("ada")).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["id"].as_i64().unwrap() > 0);

    let login = app.login("ada", USER_PASSWORD).await;
    assert_eq!(login.status().as_u16(), 200);
}

#[tokio::test]
async fn registered_user_gets_the_default_role() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;

    app.post_register(Some(&token), &payload("ada")).await;

    let account = app
        .directory
        .find_user(&Username::parse("ada").unwrap())
        .await
        .unwrap()
        .unwrap();
    let roles: Vec<_> = account.role_names().map(|name| name.to_string()).collect();
    assert_eq!(roles, ["Gamma"]);

    // Gamma may read but not register
    let ada = app.token_for("ada").await;
    assert_eq!(app.get_csrf_token(Some(&ada)).await.status().as_u16(), 200);
    assert_eq!(
        app.post_register(Some(&ada), &payload("bob"))
            .await
            .status()
            .as_u16(),
        403
    );
}

#[tokio::test]
async fn configured_default_role_is_seeded_and_assigned() {
    let mut settings = test_settings(false);
    settings.registration.default_role = "Public".to_string();
    let app = TestApp::with_settings(settings).await;
    let token = app.token_for("root").await;

    let response = app.post_register(Some(&token), &payload("ada")).await;
    assert_eq!(response.status().as_u16(), 200);

    let account = app
        .directory
        .find_user(&Username::parse("ada").unwrap())
        .await
        .unwrap()
        .unwrap();
    let roles: Vec<_> = account.role_names().map(|name| name.to_string()).collect();
    assert_eq!(roles, ["Public"]);

    let ada = app.token_for("ada").await;
    assert_eq!(app.get_csrf_token(Some(&ada)).await.status().as_u16(), 200);
}

#[tokio::test]
async fn cross_origin_preflight_allows_the_registration_headers() {
    let app = TestApp::with_csrf_enforced().await;

    let response = app
        .http_client
        .request(reqwest::Method::OPTIONS, app.url("/register/"))
        .header("origin", ALLOWED_ORIGIN)
        .header("access-control-request-method", "POST")
        .header(
            "access-control-request-headers",
            "authorization,content-type,x-csrftoken",
        )
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();
    for header in ["authorization", "content-type", "x-csrftoken"] {
        assert!(allowed.contains(header), "{header} missing from {allowed}");
    }
    assert!(app.audit_events().is_empty());
}

#[tokio::test]
async fn named_role_is_assigned() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;
    let mut body = payload("ada");
    body["role"] = json!("Editor");

    let response = app.post_register(Some(&token), &body).await;

    assert_eq!(response.status().as_u16(), 200);
    let account = app
        .directory
        .find_user(&Username::parse("ada").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(account.role_names().any(|name| name.as_str() == "Editor"));
}

#[tokio::test]
async fn anonymous_caller_is_not_authorized() {
    let app = TestApp::new().await;

    let response = app.post_register(None, &payload("ada")).await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(app.directory.user_count().await, 4);
}

#[tokio::test]
async fn caller_without_post_permission_is_forbidden() {
    let app = TestApp::new().await;
    let token = app.token_for("gamma").await;

    let response = app.post_register(Some(&token), &payload("ada")).await;

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(message(response).await, "Forbidden");
}

#[tokio::test]
async fn caller_with_permission_but_no_admin_role_is_forbidden() {
    let app = TestApp::new().await;
    let token = app.token_for("editor").await;

    let response = app.post_register(Some(&token), &payload("ada")).await;

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(message(response).await, "Not an admin.");
    assert_eq!(app.directory.user_count().await, 4);
}

#[tokio::test]
async fn non_json_request_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;

    let response = app
        .post_register_raw(
            Some(&token),
            "text/plain",
            payload("ada").to_string(),
            None,
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message(response).await, "Request is not JSON");
}

#[tokio::test]
async fn undecodable_body_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;

    let response = app
        .post_register_raw(
            Some(&token),
            "application/json",
            "{not json".to_string(),
            None,
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message(response).await, "Failed to decode JSON object");
}

#[tokio::test]
async fn missing_field_is_reported() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;
    let mut body = payload("ada");
    body.as_object_mut().unwrap().remove("email");

    let response = app.post_register(Some(&token), &body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message(response).await, "Missing required field: email");
}

#[tokio::test]
async fn unknown_role_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;
    let mut body = payload("ada");
    body["role"] = json!("Omega");

    let response = app.post_register(Some(&token), &body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message(response).await, "Role not found: Omega");
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;

    let first = app.post_register(Some(&token), &payload("ada")).await;
    let second = app.post_register(Some(&token), &payload("ada")).await;

    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;

    let first = app
        .post_register(Some(&token), &register_payload("ada", "ada@example.com"))
        .await;
    let second = app
        .post_register(Some(&token), &register_payload("bob", "ada@example.com"))
        .await;

    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn registration_is_audited_with_the_caller() {
    let app = TestApp::new().await;
    let token = app.token_for("root").await;

    app.post_register(Some(&token), &payload("ada")).await;

    let events: Vec<_> = app
        .audit_events()
        .into_iter()
        .filter(|event| event.action == "SecurityApi.register_user")
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].username.as_deref(), Some("root"));
    assert_eq!(events[0].method, "POST");
    assert_eq!(events[0].status, 200);
}

#[tokio::test]
async fn enforced_csrf_requires_a_token() {
    let app = TestApp::with_csrf_enforced().await;
    let token = app.token_for("root").await;

    let response = app.post_register(Some(&token), &payload("ada")).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.directory.user_count().await, 4);
}

#[tokio::test]
async fn enforced_csrf_accepts_a_token_from_the_same_session() {
    let app = TestApp::with_csrf_enforced().await;
    let token = app.token_for("root").await;
    let csrf: Value = app.get_csrf_token(Some(&token)).await.json().await.unwrap();
    let csrf = csrf["result"].as_str().unwrap();

    let response = app
        .post_register_raw(
            Some(&token),
            "application/json",
            payload("ada").to_string(),
            Some(csrf),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn enforced_csrf_rejects_a_token_from_another_session() {
    let app = TestApp::with_csrf_enforced().await;
    let first_session = app.token_for("root").await;
    let second_session = app.token_for("root").await;
    let csrf: Value = app
        .get_csrf_token(Some(&first_session))
        .await
        .json()
        .await
        .unwrap();
    let csrf = csrf["result"].as_str().unwrap();

    let response = app
        .post_register_raw(
            Some(&second_session),
            "application/json",
            payload("ada").to_string(),
            Some(csrf),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}
