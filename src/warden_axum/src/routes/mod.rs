//! Axum routes for the security endpoints.
//!
//! Each route pulls its state and the resolved caller out of axum, then
//! delegates to the framework-agnostic handler in `warden_adapters`.

pub mod csrf_token;
pub mod login;
pub mod register;

pub use csrf_token::csrf_token;
pub use login::{LoginState, login};
pub use register::{RegisterState, register};
