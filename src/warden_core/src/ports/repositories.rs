use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    password::Password,
    role::{Role, RoleName},
    user::{NewUser, UserAccount},
    username::Username,
};

// UserDirectory port trait and errors
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Role already exists")]
    RoleAlreadyExists,
    #[error("Role not found: {0}")]
    RoleNotFound(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserDirectoryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserAlreadyExists, Self::UserAlreadyExists) => true,
            (Self::UserNotFound, Self::UserNotFound) => true,
            (Self::RoleAlreadyExists, Self::RoleAlreadyExists) => true,
            (Self::RoleNotFound(a), Self::RoleNotFound(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Owns users and roles. Implementations hash passwords themselves.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_role(&self, name: &RoleName) -> Result<Option<Role>, UserDirectoryError>;
    async fn add_role(&self, role: Role) -> Result<(), UserDirectoryError>;
    async fn create_user(&self, user: NewUser) -> Result<UserAccount, UserDirectoryError>;
    async fn find_user(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserDirectoryError>;
    async fn verify_credentials(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<UserAccount, UserDirectoryError>;
}
