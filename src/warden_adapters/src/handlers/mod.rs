//! Framework-agnostic security handlers.
//!
//! Framework routes resolve the caller and state, then call these handlers
//! with a request implementing `ApiRequest` and a response builder.

pub mod csrf_token;
pub mod login;
pub mod register;

pub use csrf_token::handle_csrf_token;
pub use login::handle_login;
pub use register::{handle_register_user, parse_register_payload};
