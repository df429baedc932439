use axum::{Extension, extract::State, response::Response};
use warden_adapters::{ApiError, handlers};
use warden_core::{Caller, CsrfTokenProvider};

use crate::adapters::response_builder;

/// `GET /csrf_token/`
#[tracing::instrument(name = "Fetch CSRF token", skip_all, fields(username = %caller.username()))]
pub async fn csrf_token<P>(
    State(provider): State<P>,
    Extension(caller): Extension<Caller>,
) -> Result<Response, ApiError>
where
    P: CsrfTokenProvider + Clone + 'static,
{
    handlers::handle_csrf_token(&provider, &caller, response_builder())
}
