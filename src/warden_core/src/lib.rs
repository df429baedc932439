pub mod domain;
pub mod http_abstraction;
pub mod ports;
pub mod strategies;

// Re-export commonly used types for convenience
pub use domain::{
    audit::AuditEvent,
    caller::{Administrator, AuthorizationError, Caller},
    csrf_token::CsrfToken,
    email::Email,
    password::Password,
    role::{ADMIN_ROLE, DEFAULT_ROLE, Permission, Role, RoleName, SECURITY_RESOURCE},
    session::SessionId,
    user::{NewUser, UserAccount, UserError, UserId},
    username::{PersonName, Username},
};

pub use ports::{
    repositories::{UserDirectory, UserDirectoryError},
    services::{AuditLogger, CsrfError, CsrfTokenProvider},
};

pub use strategies::auth_validator::AuthValidator;

pub use http_abstraction::{ApiRequest, ApiResponseBuilder, ApiResponseHelpers};
