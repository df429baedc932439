use warden_core::{
    Administrator, Email, NewUser, Password, PersonName, Role, RoleName, UserAccount,
    UserDirectory, UserDirectoryError, Username,
};

/// Which role a new account receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSelection {
    /// The directory's default role (`Gamma` unless configured otherwise)
    Default,
    /// A role looked up by name
    Named(RoleName),
}

/// Validated registration payload
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Email,
    pub password: Password,
    pub role: RoleSelection,
}

/// Error types specific to the register user use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterUserError {
    #[error("Role not found: {0}")]
    UnknownRole(RoleName),
    #[error("Default role {0} does not exist")]
    DefaultRoleMissing(RoleName),
    #[error("User directory error: {0}")]
    UserDirectoryError(#[from] UserDirectoryError),
}

/// Register user use case - an administrator creates an account with a role
pub struct RegisterUserUseCase<'a, D>
where
    D: UserDirectory,
{
    directory: &'a D,
    default_role: &'a RoleName,
}

impl<'a, D> RegisterUserUseCase<'a, D>
where
    D: UserDirectory,
{
    pub fn new(directory: &'a D, default_role: &'a RoleName) -> Self {
        Self {
            directory,
            default_role,
        }
    }

    /// Execute the register user use case
    ///
    /// Taking an `Administrator` means the admin-role check has already passed.
    ///
    /// # Returns
    /// The created account, or an error if the role cannot be resolved or the
    /// directory refuses the account
    #[tracing::instrument(
        name = "RegisterUserUseCase::execute",
        skip_all,
        fields(admin = %admin.caller().username(), username = %command.username)
    )]
    pub async fn execute(
        &self,
        admin: &Administrator,
        command: RegisterUserCommand,
    ) -> Result<UserAccount, RegisterUserError> {
        let role = self.resolve_role(&command.role).await?;

        let new_user = NewUser {
            username: command.username,
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            role,
            password: command.password,
        };

        let account = self.directory.create_user(new_user).await?;

        tracing::info!(
            user_id = account.id().get(),
            role = %account.role_names().map(RoleName::as_str).collect::<Vec<_>>().join(","),
            "User registered"
        );

        Ok(account)
    }

    async fn resolve_role(&self, selection: &RoleSelection) -> Result<Role, RegisterUserError> {
        match selection {
            RoleSelection::Default => self
                .directory
                .find_role(self.default_role)
                .await?
                .ok_or_else(|| RegisterUserError::DefaultRoleMissing(self.default_role.clone())),
            RoleSelection::Named(name) => self
                .directory
                .find_role(name)
                .await?
                .ok_or_else(|| RegisterUserError::UnknownRole(name.clone())),
        }
    }
}
