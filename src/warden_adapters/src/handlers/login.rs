//! Framework-agnostic login handler.

use secrecy::Secret;
use serde::Deserialize;
use warden_application::LoginUseCase;
use warden_core::{
    ApiRequest, ApiResponseBuilder, ApiResponseHelpers, Password, SessionId, UserDirectory,
    Username,
};

use crate::http::{ApiError, INVALID_LOGIN, NOT_JSON, UNDECODABLE_JSON};
use crate::session::{JwtSessionConfig, create_session_cookie, generate_session_token};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Secret<String>,
}

/// Verifies credentials and starts a new session.
///
/// The session token is returned in the body as `access_token` and set as the
/// session cookie.
#[tracing::instrument(name = "Login", skip_all)]
pub async fn handle_login<R, D, B>(
    request: &R,
    directory: &D,
    config: &JwtSessionConfig,
    builder: B,
) -> Result<B::Response, ApiError>
where
    R: ApiRequest,
    D: UserDirectory,
    B: ApiResponseBuilder,
{
    if !request.is_json() {
        return Err(ApiError::bad_request(NOT_JSON));
    }

    let credentials: LoginRequest = serde_json::from_slice(request.body())
        .map_err(|_| ApiError::bad_request(UNDECODABLE_JSON))?;

    let invalid_login = |_| ApiError::Unauthorized(INVALID_LOGIN.to_string());
    let username = Username::parse(credentials.username).map_err(invalid_login)?;
    let password = Password::try_from(credentials.password).map_err(invalid_login)?;

    let account = LoginUseCase::new(directory)
        .execute(username, password)
        .await?;

    let token = generate_session_token(account.username(), &SessionId::new(), config)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let cookie = create_session_cookie(token.clone(), &config.cookie_name);

    tracing::info!(username = %account.username(), "Session started");

    Ok(builder
        .cookie(&cookie.to_string())
        .ok_json(serde_json::json!({ "access_token": token })))
}
