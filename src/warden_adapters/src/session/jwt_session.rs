use async_trait::async_trait;
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_core::{AuthValidator, Caller, SessionId, UserDirectory, Username};

#[derive(Clone)]
pub struct JwtSessionConfig {
    pub cookie_name: String,
    pub secret: Secret<String>,
    pub ttl_in_seconds: i64,
}

impl JwtSessionConfig {
    pub fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

/// Resolves the caller behind a bearer token or session cookie.
#[derive(Clone)]
pub struct JwtSessionValidator<D> {
    directory: D,
    config: JwtSessionConfig,
}

impl<D> JwtSessionValidator<D> {
    pub fn new(directory: D, config: JwtSessionConfig) -> Self {
        Self { directory, config }
    }

    pub fn config(&self) -> &JwtSessionConfig {
        &self.config
    }
}

#[async_trait]
impl<D: UserDirectory + Clone + 'static> AuthValidator for JwtSessionValidator<D> {
    type Claims = Caller;
    type RequestParts = http::request::Parts;
    type Error = SessionError;

    async fn validate(&self, parts: &Self::RequestParts) -> Result<Self::Claims, Self::Error> {
        let token = extract_token(parts, &self.config.cookie_name)?;

        let claims = validate_session_token(&token, &self.config)?;

        let username = Username::parse(claims.sub).map_err(|_| SessionError::InvalidToken)?;
        let account = self
            .directory
            .find_user(&username)
            .await
            .map_err(|e| SessionError::UnexpectedError(e.to_string()))?
            .ok_or(SessionError::UnknownUser)?;

        if !account.is_active() {
            return Err(SessionError::InactiveUser);
        }

        Ok(Caller::from_account(account, SessionId::from(claims.sid)))
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token error: {0}")]
    TokenError(jsonwebtoken::errors::Error),
    #[error("Unknown user")]
    UnknownUser,
    #[error("User is inactive")]
    InactiveUser,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// Bearer header first, then the session cookie.
pub fn extract_token(
    parts: &http::request::Parts,
    cookie_name: &str,
) -> Result<String, SessionError> {
    if let Some(header) = parts.headers.get(http::header::AUTHORIZATION) {
        let value = header.to_str().map_err(|_| SessionError::InvalidToken)?;
        return value
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty())
            .ok_or(SessionError::InvalidToken);
    }

    let jar = CookieJar::from_headers(&parts.headers);
    match jar.get(cookie_name) {
        Some(cookie) => Ok(cookie.value().to_owned()),
        None => Err(SessionError::MissingToken),
    }
}

// Create cookie and set the value to the passed-in token string
pub fn create_session_cookie(token: String, cookie_name: &str) -> Cookie<'_> {
    Cookie::build((cookie_name, token))
        .path("/") // apply cookie to all URLs on the server
        .http_only(true) // prevent JavaScript from accessing the cookie
        .secure(true)
        .same_site(SameSite::Lax) // send cookie with "same-site" requests, and with "cross-site" top-level navigations.
        .build()
}

// Create session token
pub fn generate_session_token(
    username: &Username,
    session_id: &SessionId,
    config: &JwtSessionConfig,
) -> Result<String, SessionError> {
    let delta = chrono::Duration::try_seconds(config.ttl_in_seconds).ok_or(
        SessionError::UnexpectedError("Failed to create session token duration".to_string()),
    )?;

    // Create JWT expiration time
    let exp = Utc::now()
        .checked_add_signed(delta)
        .ok_or(SessionError::UnexpectedError(
            "Duration out of range".to_string(),
        ))?
        .timestamp();

    // Cast exp to a usize, which is what SessionClaims expects
    let exp: usize = exp
        .try_into()
        .map_err(|_| SessionError::UnexpectedError("Failed to cast i64 to usize".to_string()))?;

    let claims = SessionClaims {
        sub: username.as_str().to_owned(),
        sid: session_id.as_str().to_owned(),
        exp,
    };

    encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(config.as_bytes()),
    )
    .map_err(SessionError::TokenError)
}

// Check if the session token is valid by decoding it using the session secret
pub fn validate_session_token(
    token: &str,
    config: &JwtSessionConfig,
) -> Result<SessionClaims, SessionError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(SessionError::TokenError)
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,
    pub sid: String,
    pub exp: usize,
}
