//! Framework-agnostic user registration handler.

use secrecy::Secret;
use serde_json::{Map, Value};
use warden_application::{RegisterUserCommand, RegisterUserUseCase, RoleSelection};
use warden_core::{
    Administrator, ApiRequest, ApiResponseBuilder, ApiResponseHelpers, Caller, Email, Password,
    PersonName, RoleName, UserDirectory, UserError, Username,
};

use crate::http::{ApiError, NOT_JSON, UNDECODABLE_JSON};

/// Registers a user on behalf of an administrator.
///
/// Checks run in a fixed order: JSON content type, admin role, payload.
/// Permission and authentication gates have already passed by the time this
/// is called.
#[tracing::instrument(name = "Register user", skip_all, fields(caller = %caller.username()))]
pub async fn handle_register_user<R, D, B>(
    request: &R,
    caller: Caller,
    directory: &D,
    default_role: &RoleName,
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

    let admin = Administrator::try_from(caller)?;
    let command = parse_register_payload(request.body())?;

    let account = RegisterUserUseCase::new(directory, default_role)
        .execute(&admin, command)
        .await?;

    Ok(builder.ok_json(serde_json::json!({ "id": account.id() })))
}

/// Decode and validate a registration body.
///
/// `role` may be absent or falsy (`null`, `false`, `0`, `""`, `[]`, `{}`), in
/// which case the default role applies.
pub fn parse_register_payload(body: &[u8]) -> Result<RegisterUserCommand, ApiError> {
    let Ok(Value::Object(mut payload)) = serde_json::from_slice::<Value>(body) else {
        return Err(ApiError::bad_request(UNDECODABLE_JSON));
    };

    let username = Username::parse(required(&mut payload, "username")?)?;
    let first_name = PersonName::parse("first_name", required(&mut payload, "first_name")?)?;
    let last_name = PersonName::parse("last_name", required(&mut payload, "last_name")?)?;
    let email = Email::parse(Secret::from(required(&mut payload, "email")?))?;
    let password = Password::try_from(Secret::from(required(&mut payload, "password")?))?;
    let role = role_selection(payload.remove("role"))?;

    Ok(RegisterUserCommand {
        username,
        first_name,
        last_name,
        email,
        password,
        role,
    })
}

fn required(payload: &mut Map<String, Value>, field: &'static str) -> Result<String, ApiError> {
    match payload.remove(field) {
        None | Some(Value::Null) => Err(UserError::MissingField(field).into()),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(ApiError::BadRequest(format!("Field {field} must be a string"))),
    }
}

fn role_selection(role: Option<Value>) -> Result<RoleSelection, ApiError> {
    match role {
        None => Ok(RoleSelection::Default),
        Some(value) if is_falsy(&value) => Ok(RoleSelection::Default),
        Some(Value::String(name)) => Ok(RoleSelection::Named(RoleName::parse(name)?)),
        Some(_) => Err(ApiError::bad_request("Field role must be a string")),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
