use warden_core::{Password, UserAccount, UserDirectory, UserDirectoryError, Username};

/// Error types specific to login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid login")]
    InvalidLogin,
    #[error("User directory error: {0}")]
    UserDirectoryError(UserDirectoryError),
}

impl From<UserDirectoryError> for LoginError {
    fn from(error: UserDirectoryError) -> Self {
        match error {
            UserDirectoryError::UserNotFound | UserDirectoryError::InvalidCredentials => {
                LoginError::InvalidLogin
            }
            other => LoginError::UserDirectoryError(other),
        }
    }
}

/// Login use case - verifies credentials of an active account
pub struct LoginUseCase<'a, D>
where
    D: UserDirectory,
{
    directory: &'a D,
}

impl<'a, D> LoginUseCase<'a, D>
where
    D: UserDirectory,
{
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        username: Username,
        password: Password,
    ) -> Result<UserAccount, LoginError> {
        let account = self
            .directory
            .verify_credentials(&username, &password)
            .await?;

        if !account.is_active() {
            tracing::warn!("Login attempt for inactive user");
            return Err(LoginError::InvalidLogin);
        }

        Ok(account)
    }
}
