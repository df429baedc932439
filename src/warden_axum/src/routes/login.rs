use axum::{extract::State, response::Response};
use warden_adapters::{ApiError, JwtSessionConfig, handlers};
use warden_core::UserDirectory;

use crate::adapters::{AxumRequest, response_builder};

#[derive(Clone)]
pub struct LoginState<D> {
    pub directory: D,
    pub session: JwtSessionConfig,
}

/// `POST /login/`
pub async fn login<D>(
    State(state): State<LoginState<D>>,
    request: AxumRequest,
) -> Result<Response, ApiError>
where
    D: UserDirectory + Clone + 'static,
{
    handlers::handle_login(&request, &state.directory, &state.session, response_builder()).await
}
