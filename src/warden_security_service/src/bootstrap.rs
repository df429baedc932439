//! Start-up seeding of the built-in roles and the first administrator.

use thiserror::Error;
use warden_adapters::config::BootstrapAdminSettings;
use warden_core::{
    ADMIN_ROLE, Email, NewUser, Password, Permission, PersonName, Role, RoleName,
    SECURITY_RESOURCE, UserDirectory, UserDirectoryError, UserError, Username,
};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Invalid bootstrap admin: {0}")]
    InvalidAdmin(#[from] UserError),
    #[error("User directory error: {0}")]
    UserDirectory(#[from] UserDirectoryError),
}

/// Role holding both security permissions. Its name matches the admin check.
pub fn admin_role() -> Result<Role, UserError> {
    Ok(Role::new(RoleName::parse(capitalize(ADMIN_ROLE))?)
        .with_permission(Permission::read(SECURITY_RESOURCE))
        .with_permission(Permission::post(SECURITY_RESOURCE)))
}

/// Role assigned to registered users by default. Read access only.
pub fn default_role(name: RoleName) -> Role {
    Role::new(name).with_permission(Permission::read(SECURITY_RESOURCE))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Ensure the admin role and the configured default role exist, then create
/// the configured admin account.
///
/// Safe to run on every start: existing roles and an existing admin user are
/// left untouched.
#[tracing::instrument(name = "Bootstrap", skip_all)]
pub async fn bootstrap<D>(
    directory: &D,
    default_role_name: &RoleName,
    admin: Option<&BootstrapAdminSettings>,
) -> Result<(), BootstrapError>
where
    D: UserDirectory,
{
    let admin_role = admin_role()?;
    for role in [admin_role.clone(), default_role(default_role_name.clone())] {
        let name = role.name().clone();
        match directory.add_role(role).await {
            Ok(()) => tracing::info!(role = %name, "Role created"),
            Err(UserDirectoryError::RoleAlreadyExists) => {
                tracing::debug!(role = %name, "Role already present")
            }
            Err(e) => return Err(e.into()),
        }
    }

    let Some(admin) = admin else {
        return Ok(());
    };

    let username = Username::parse(admin.username.clone())?;
    if directory.find_user(&username).await?.is_some() {
        tracing::debug!(username = %username, "Admin user already present");
        return Ok(());
    }

    let new_user = NewUser {
        username,
        first_name: PersonName::parse("first_name", admin.first_name.clone())?,
        last_name: PersonName::parse("last_name", admin.last_name.clone())?,
        email: Email::parse(admin.email.clone().into())?,
        role: admin_role,
        password: Password::try_from(admin.password.clone())?,
    };
    let account = directory.create_user(new_user).await?;
    tracing::info!(username = %account.username(), "Admin user created");

    Ok(())
}
