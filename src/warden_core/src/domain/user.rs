use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    email::Email,
    password::Password,
    role::{Role, RoleName},
    username::{PersonName, Username},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must not be empty")]
    InvalidPassword,
    #[error("Invalid username: {0}")]
    InvalidUsername(&'static str),
    #[error("Invalid {field}: {reason}")]
    InvalidName {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Invalid role name")]
    InvalidRoleName,
}

/// Directory-assigned identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

/// Everything the directory needs to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Email,
    pub role: Role,
    pub password: Password,
}

/// A stored user account. The password hash never leaves the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    id: UserId,
    username: Username,
    first_name: PersonName,
    last_name: PersonName,
    email: Email,
    roles: Vec<Role>,
    active: bool,
}

impl UserAccount {
    pub fn new(
        id: UserId,
        username: Username,
        first_name: PersonName,
        last_name: PersonName,
        email: Email,
        roles: Vec<Role>,
        active: bool,
    ) -> Self {
        Self {
            id,
            username,
            first_name,
            last_name,
            email,
            roles,
            active,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn role_names(&self) -> impl Iterator<Item = &RoleName> {
        self.roles.iter().map(Role::name)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
