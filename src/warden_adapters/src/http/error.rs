use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_application::{LoginError, RegisterUserError};
use warden_core::{AuthorizationError, CsrfError, UserDirectoryError, UserError};

use crate::session::SessionError;

pub const NOT_AUTHORIZED: &str = "Not authorized";
pub const FORBIDDEN: &str = "Forbidden";
pub const NOT_JSON: &str = "Request is not JSON";
pub const UNDECODABLE_JSON: &str = "Failed to decode JSON object";
pub const INVALID_LOGIN: &str = "Invalid login";
const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Unexpected error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client. Internal details stay in the logs.
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
            | ApiError::Conflict(message) => message,
            ApiError::Internal(_) => INTERNAL_ERROR,
        }
    }

    fn log(&self) {
        if let ApiError::Internal(detail) = self {
            tracing::error!(error = %detail, "Request failed");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(ErrorResponse {
            message: self.message().to_owned(),
        });

        (self.status(), body).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(error: AuthorizationError) -> Self {
        ApiError::Forbidden(error.to_string())
    }
}

impl From<UserDirectoryError> for ApiError {
    fn from(error: UserDirectoryError) -> Self {
        match error {
            UserDirectoryError::UserAlreadyExists => ApiError::Conflict(error.to_string()),
            UserDirectoryError::RoleNotFound(_) => ApiError::BadRequest(error.to_string()),
            UserDirectoryError::UserNotFound | UserDirectoryError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_LOGIN.to_string())
            }
            UserDirectoryError::RoleAlreadyExists | UserDirectoryError::UnexpectedError(_) => {
                ApiError::Internal(error.to_string())
            }
        }
    }
}

impl From<RegisterUserError> for ApiError {
    fn from(error: RegisterUserError) -> Self {
        match error {
            RegisterUserError::UnknownRole(_) => ApiError::BadRequest(error.to_string()),
            RegisterUserError::DefaultRoleMissing(_) => ApiError::Internal(error.to_string()),
            RegisterUserError::UserDirectoryError(e) => e.into(),
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidLogin => ApiError::Unauthorized(INVALID_LOGIN.to_string()),
            LoginError::UserDirectoryError(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CsrfError> for ApiError {
    fn from(error: CsrfError) -> Self {
        match error {
            CsrfError::Missing | CsrfError::Expired | CsrfError::Invalid => {
                ApiError::BadRequest(error.to_string())
            }
            CsrfError::Signing(e) => ApiError::Internal(e),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        if let SessionError::UnexpectedError(detail) = &error {
            tracing::error!(error = %detail, "Session lookup failed");
        } else {
            tracing::debug!(error = %error, "Session rejected");
        }
        ApiError::Unauthorized(NOT_AUTHORIZED.to_string())
    }
}
