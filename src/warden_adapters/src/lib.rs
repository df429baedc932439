//! Adapters for the Warden security API.
//!
//! Implementations of the `warden_core` ports (session validation, CSRF
//! tokens, user directories, audit logging), settings, the HTTP error type and
//! the framework-agnostic handlers.

pub mod audit;
pub mod config;
pub mod csrf;
pub mod handlers;
pub mod http;
pub mod persistence;
pub mod session;

pub use audit::TracingAuditLogger;
pub use csrf::{CsrfConfig, SignedCsrfTokenProvider};
pub use http::ApiError;
pub use persistence::{HashMapUserDirectory, PostgresUserDirectory};
pub use session::{JwtSessionConfig, JwtSessionValidator, SessionError};
