//! Axum integration for the Warden security API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  warden_core: HTTP trait definitions     │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  warden_axum: Axum implementations       │
//! │  - AxumRequest / AxumResponseBuilder     │
//! │  - middleware chain                      │
//! │  - Axum route handlers                   │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use warden_axum::{SecurityLayers, routes};
//!
//! let csrf = Router::new()
//!     .route("/csrf_token/", get(routes::csrf_token::<SignedCsrfTokenProvider>));
//! let csrf = layers
//!     .protect(csrf, Permission::read(SECURITY_RESOURCE), "SecurityApi.csrf_token")
//!     .with_state(provider);
//! ```

pub mod adapters;
pub mod middleware;
pub mod routes;

pub use adapters::{AxumRequest, AxumResponseBuilder, response_builder};
pub use middleware::{AuditState, CsrfGuard, SecurityLayers, handle_panic};
