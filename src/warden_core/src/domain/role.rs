use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use super::user::UserError;

/// Role name the registration endpoint requires, compared case-insensitively.
pub const ADMIN_ROLE: &str = "admin";
/// Role assigned to new users when the request names none.
pub const DEFAULT_ROLE: &str = "Gamma";
/// Resource the security endpoints are registered under.
pub const SECURITY_RESOURCE: &str = "Security";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, UserError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() > 64 {
            return Err(UserError::InvalidRoleName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0.to_lowercase() == ADMIN_ROLE
    }
}

impl TryFrom<String> for RoleName {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An `(action, resource)` capability, e.g. `read` on `Security`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permission {
    action: String,
    resource: String,
}

impl Permission {
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
        }
    }

    pub fn read(resource: impl Into<String>) -> Self {
        Self::new("read", resource)
    }

    pub fn post(resource: impl Into<String>) -> Self {
        Self::new("post", resource)
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "can_{} on {}", self.action, self.resource)
    }
}

/// A named grouping of permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: RoleName,
    permissions: BTreeSet<Permission>,
}

impl Role {
    pub fn new(name: RoleName) -> Self {
        Self {
            name,
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    pub fn name(&self) -> &RoleName {
        &self.name
    }

    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    pub fn grants(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }
}
