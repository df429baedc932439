use thiserror::Error;

use super::{
    role::{Permission, Role, RoleName},
    session::SessionId,
    user::{UserAccount, UserId},
    username::Username,
};

/// The authenticated principal behind the current request.
#[derive(Debug, Clone)]
pub struct Caller {
    user_id: UserId,
    username: Username,
    session_id: SessionId,
    roles: Vec<Role>,
}

impl Caller {
    pub fn new(user_id: UserId, username: Username, session_id: SessionId, roles: Vec<Role>) -> Self {
        Self {
            user_id,
            username,
            session_id,
            roles,
        }
    }

    /// Builds the caller for an account resolved from a session token.
    pub fn from_account(account: UserAccount, session_id: SessionId) -> Self {
        Self {
            user_id: account.id(),
            username: account.username().clone(),
            session_id,
            roles: account.roles().to_vec(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn role_names(&self) -> impl Iterator<Item = &RoleName> {
        self.roles.iter().map(Role::name)
    }

    pub fn is_admin(&self) -> bool {
        self.role_names().any(RoleName::is_admin)
    }

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.roles.iter().any(|role| role.grants(permission))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Not an admin.")]
    NotAnAdmin,
}

/// A caller proven to hold an admin role.
#[derive(Debug, Clone)]
pub struct Administrator(Caller);

impl Administrator {
    pub fn caller(&self) -> &Caller {
        &self.0
    }
}

impl TryFrom<Caller> for Administrator {
    type Error = AuthorizationError;

    fn try_from(caller: Caller) -> Result<Self, Self::Error> {
        if caller.is_admin() {
            Ok(Self(caller))
        } else {
            Err(AuthorizationError::NotAnAdmin)
        }
    }
}
