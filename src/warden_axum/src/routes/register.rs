use axum::{Extension, extract::State, response::Response};
use warden_adapters::{ApiError, handlers};
use warden_core::{Caller, RoleName, UserDirectory};

use crate::adapters::{AxumRequest, response_builder};

#[derive(Clone)]
pub struct RegisterState<D> {
    pub directory: D,
    pub default_role: RoleName,
}

/// `POST /register/`
pub async fn register<D>(
    State(state): State<RegisterState<D>>,
    Extension(caller): Extension<Caller>,
    request: AxumRequest,
) -> Result<Response, ApiError>
where
    D: UserDirectory + Clone + 'static,
{
    handlers::handle_register_user(
        &request,
        caller,
        &state.directory,
        &state.default_role,
        response_builder(),
    )
    .await
}
