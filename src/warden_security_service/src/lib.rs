pub mod bootstrap;
mod helpers;
mod security_service;
mod tracing;

pub use bootstrap::{BootstrapError, bootstrap};
pub use helpers::{configure_postgresql, get_postgres_pool};
pub use security_service::{SecurityService, SecurityServiceError};

// Re-export commonly used types
pub use warden_adapters::config::{AllowedOrigins, SecurityServiceSettings};
pub use warden_core::{AuditLogger, UserDirectory};
