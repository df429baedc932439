//! # Warden - Security API Library
//!
//! This is a facade crate that re-exports all public APIs from the security service components.
//! Use this crate to get access to users, roles, sessions and the security routes in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! warden = { path = "../warden" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Username`, `Email`, `Role`, `Permission`, `Caller`, etc.
//! - **Port traits**: `UserDirectory`, `CsrfTokenProvider`, `AuditLogger`
//! - **Use cases**: `RegisterUserUseCase`, `LoginUseCase`, `FetchCsrfTokenUseCase`
//! - **Adapters**: `PostgresUserDirectory`, `SignedCsrfTokenProvider`, `JwtSessionValidator`, etc.
//! - **Service**: `SecurityService` - The main entry point for the security API

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use warden_core::*;
}

// Re-export most commonly used core types at the root level
pub use warden_core::{
    Administrator, AuditEvent, AuthorizationError, Caller, CsrfToken, Email, NewUser, Password,
    Permission, PersonName, Role, RoleName, SessionId, UserAccount, UserError, UserId, Username,
};

// ============================================================================
// Ports
// ============================================================================

/// Repository and service trait definitions
pub mod ports {
    pub use warden_core::{
        AuditLogger, AuthValidator, CsrfError, CsrfTokenProvider, UserDirectory,
        UserDirectoryError,
    };
}

// Re-export port traits at root level
pub use ports::{
    AuditLogger, AuthValidator, CsrfError, CsrfTokenProvider, UserDirectory, UserDirectoryError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use warden_application::*;
}

// Re-export use cases at root level
pub use warden_application::{
    FetchCsrfTokenUseCase, LoginError, LoginUseCase, RegisterUserCommand, RegisterUserError,
    RegisterUserUseCase, RoleSelection,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Framework-agnostic HTTP handlers
    pub mod handlers {
        pub use warden_adapters::handlers::*;
    }

    /// Error responses
    pub mod http {
        pub use warden_adapters::http::*;
    }

    /// User directory implementations
    pub mod persistence {
        pub use warden_adapters::persistence::*;
    }

    /// Session tokens and the session validator
    pub mod session {
        pub use warden_adapters::session::*;
    }

    /// CSRF token provider
    pub mod csrf {
        pub use warden_adapters::csrf::*;
    }

    /// Configuration
    pub mod config {
        pub use warden_adapters::config::*;
    }

    /// Axum routes and middleware
    pub mod axum {
        pub use warden_axum::*;
    }
}

// Re-export commonly used adapters at root level
pub use warden_adapters::{
    ApiError, CsrfConfig, HashMapUserDirectory, JwtSessionConfig, JwtSessionValidator,
    PostgresUserDirectory, SessionError, SignedCsrfTokenProvider, TracingAuditLogger,
    config::{AllowedOrigins, SecurityServiceSettings},
};

// ============================================================================
// Security Service (Main Entry Point)
// ============================================================================

/// Main security service
pub use warden_security_service::{
    BootstrapError, SecurityService, SecurityServiceError, bootstrap, configure_postgresql,
    get_postgres_pool,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

/// Re-export axum for mounting the service router
pub use axum;

pub use http;
