//! Framework-agnostic CSRF token handler.

use warden_application::FetchCsrfTokenUseCase;
use warden_core::{ApiResponseBuilder, ApiResponseHelpers, Caller, CsrfTokenProvider};

use crate::http::ApiError;

/// Returns a fresh CSRF token for the caller's session as `{"result": token}`.
pub fn handle_csrf_token<P, B>(
    provider: &P,
    caller: &Caller,
    builder: B,
) -> Result<B::Response, ApiError>
where
    P: CsrfTokenProvider,
    B: ApiResponseBuilder,
{
    let token = FetchCsrfTokenUseCase::new(provider).execute(caller)?;

    Ok(builder.ok_json(serde_json::json!({ "result": token.into_string() })))
}
