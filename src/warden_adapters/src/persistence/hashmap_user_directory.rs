use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use secrecy::Secret;
use warden_core::{
    Email, NewUser, Password, PersonName, Role, RoleName, UserAccount, UserDirectory,
    UserDirectoryError, UserId, Username,
};

use super::password_hash::{compute_password_hash, verify_password_hash};

struct StoredUser {
    id: UserId,
    username: Username,
    first_name: PersonName,
    last_name: PersonName,
    email: Email,
    role_names: Vec<RoleName>,
    active: bool,
    password_hash: Secret<String>,
}

#[derive(Default)]
struct DirectoryState {
    roles: HashMap<RoleName, Role>,
    users: HashMap<Username, StoredUser>,
    last_id: i64,
}

impl DirectoryState {
    // Roles are resolved on read so permission changes apply to existing users.
    fn account(&self, user: &StoredUser) -> UserAccount {
        let roles = user
            .role_names
            .iter()
            .filter_map(|name| self.roles.get(name).cloned())
            .collect();

        UserAccount::new(
            user.id,
            user.username.clone(),
            user.first_name.clone(),
            user.last_name.clone(),
            user.email.clone(),
            roles,
            user.active,
        )
    }
}

/// In-memory user directory, used when no database is configured and in tests.
#[derive(Default, Clone)]
pub struct HashMapUserDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl HashMapUserDirectory {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(DirectoryState::default())),
        }
    }

    pub async fn set_active(
        &self,
        username: &Username,
        active: bool,
    ) -> Result<(), UserDirectoryError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(username)
            .ok_or(UserDirectoryError::UserNotFound)?;
        user.active = active;
        Ok(())
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

#[async_trait::async_trait]
impl UserDirectory for HashMapUserDirectory {
    async fn find_role(&self, name: &RoleName) -> Result<Option<Role>, UserDirectoryError> {
        let state = self.state.read().await;
        Ok(state.roles.get(name).cloned())
    }

    async fn add_role(&self, role: Role) -> Result<(), UserDirectoryError> {
        let mut state = self.state.write().await;
        if state.roles.contains_key(role.name()) {
            return Err(UserDirectoryError::RoleAlreadyExists);
        }
        state.roles.insert(role.name().clone(), role);
        Ok(())
    }

    #[tracing::instrument(name = "Adding user to in-memory directory", skip_all)]
    async fn create_user(&self, user: NewUser) -> Result<UserAccount, UserDirectoryError> {
        let password_hash = compute_password_hash(user.password)
            .await
            .map_err(UserDirectoryError::UnexpectedError)?;

        let mut state = self.state.write().await;

        if state.users.contains_key(&user.username)
            || state.users.values().any(|u| u.email == user.email)
        {
            return Err(UserDirectoryError::UserAlreadyExists);
        }

        let role_name = user.role.name().clone();
        if !state.roles.contains_key(&role_name) {
            return Err(UserDirectoryError::RoleNotFound(role_name.to_string()));
        }

        state.last_id += 1;
        let stored = StoredUser {
            id: UserId::new(state.last_id),
            username: user.username.clone(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role_names: vec![role_name],
            active: true,
            password_hash,
        };
        let account = state.account(&stored);
        state.users.insert(user.username, stored);

        Ok(account)
    }

    async fn find_user(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserDirectoryError> {
        let state = self.state.read().await;
        Ok(state.users.get(username).map(|user| state.account(user)))
    }

    #[tracing::instrument(name = "Validating user credentials in memory", skip_all)]
    async fn verify_credentials(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<UserAccount, UserDirectoryError> {
        let (account, password_hash) = {
            let state = self.state.read().await;
            let user = state
                .users
                .get(username)
                .ok_or(UserDirectoryError::UserNotFound)?;
            (state.account(user), user.password_hash.clone())
        };

        verify_password_hash(password_hash, password.clone())
            .await
            .map_err(|_| UserDirectoryError::InvalidCredentials)?;

        Ok(account)
    }
}
