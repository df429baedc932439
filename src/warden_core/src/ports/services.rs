use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{audit::AuditEvent, csrf_token::CsrfToken, session::SessionId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsrfError {
    #[error("The CSRF token is missing.")]
    Missing,
    #[error("The CSRF token has expired.")]
    Expired,
    #[error("The CSRF token is invalid.")]
    Invalid,
    #[error("Failed to sign CSRF token: {0}")]
    Signing(String),
}

/// Issues and checks session-bound anti-forgery tokens.
pub trait CsrfTokenProvider: Send + Sync {
    fn generate(&self, session_id: &SessionId) -> Result<CsrfToken, CsrfError>;
    fn validate(&self, session_id: &SessionId, token: &str) -> Result<(), CsrfError>;
}

/// Records audited endpoint calls. Logging must not fail the request.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log(&self, event: AuditEvent);
}
