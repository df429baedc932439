use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Postgres, Transaction};
use warden_core::{
    Email, NewUser, Password, Permission, PersonName, Role, RoleName, UserAccount, UserDirectory,
    UserDirectoryError, UserId, Username,
};

use super::password_hash::{compute_password_hash, verify_password_hash};

type UserRow = (i64, String, String, String, String, bool);

#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        PostgresUserDirectory { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn load_roles(&self, user_id: i64) -> Result<Vec<Role>, UserDirectoryError> {
        let rows: Vec<(String, Option<String>, Option<String>)> = sqlx::query_as(
            r#"
                SELECT r.name, p.action, p.resource
                FROM user_roles ur
                JOIN roles r ON r.id = ur.role_id
                LEFT JOIN role_permissions p ON p.role_id = r.id
                WHERE ur.user_id = $1
                ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut roles: Vec<Role> = Vec::new();
        for (name, action, resource) in rows {
            let name = RoleName::parse(name).map_err(unexpected)?;
            if roles.last().map(Role::name) != Some(&name) {
                roles.push(Role::new(name));
            }
            if let (Some(action), Some(resource)) = (action, resource) {
                if let Some(role) = roles.pop() {
                    roles.push(role.with_permission(Permission::new(action, resource)));
                }
            }
        }

        Ok(roles)
    }

    async fn account_from_row(&self, row: UserRow) -> Result<UserAccount, UserDirectoryError> {
        let (id, username, first_name, last_name, email, active) = row;
        let roles = self.load_roles(id).await?;

        Ok(UserAccount::new(
            UserId::new(id),
            Username::parse(username).map_err(unexpected)?,
            PersonName::parse("first_name", first_name).map_err(unexpected)?,
            PersonName::parse("last_name", last_name).map_err(unexpected)?,
            Email::try_from(Secret::from(email)).map_err(unexpected)?,
            roles,
            active,
        ))
    }
}

fn unexpected(e: impl ToString) -> UserDirectoryError {
    UserDirectoryError::UnexpectedError(e.to_string())
}

fn map_insert_error(e: sqlx::Error, on_conflict: UserDirectoryError) -> UserDirectoryError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_conflict;
        }
    }
    unexpected(e)
}

async fn find_role_id(
    tx: &mut Transaction<'_, Postgres>,
    name: &RoleName,
) -> Result<Option<i64>, UserDirectoryError> {
    sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(name.as_str())
        .fetch_optional(&mut **tx)
        .await
        .map_err(unexpected)
}

#[async_trait::async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[tracing::instrument(name = "Retrieving role from PostgreSQL", skip_all, fields(role = %name))]
    async fn find_role(&self, name: &RoleName) -> Result<Option<Role>, UserDirectoryError> {
        let rows: Vec<(Option<String>, Option<String>)> = sqlx::query_as(
            r#"
                SELECT p.action, p.resource
                FROM roles r
                LEFT JOIN role_permissions p ON p.role_id = r.id
                WHERE r.name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let role = rows
            .into_iter()
            .filter_map(|(action, resource)| Some(Permission::new(action?, resource?)))
            .fold(Role::new(name.clone()), Role::with_permission);

        Ok(Some(role))
    }

    #[tracing::instrument(name = "Adding role to PostgreSQL", skip_all, fields(role = %role.name()))]
    async fn add_role(&self, role: Role) -> Result<(), UserDirectoryError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let id: i64 = sqlx::query_scalar("INSERT INTO roles (name) VALUES ($1) RETURNING id")
            .bind(role.name().as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, UserDirectoryError::RoleAlreadyExists))?;

        for permission in role.permissions() {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, action, resource) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(permission.action())
            .bind(permission.resource())
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)
    }

    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn create_user(&self, user: NewUser) -> Result<UserAccount, UserDirectoryError> {
        let password_hash = compute_password_hash(user.password)
            .await
            .map_err(UserDirectoryError::UnexpectedError)?;

        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let role_id = find_role_id(&mut tx, user.role.name())
            .await?
            .ok_or_else(|| UserDirectoryError::RoleNotFound(user.role.name().to_string()))?;

        let id: i64 = sqlx::query_scalar(
            r#"
                INSERT INTO users (username, first_name, last_name, email, password_hash)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.email.as_ref().expose_secret())
        .bind(password_hash.expose_secret())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, UserDirectoryError::UserAlreadyExists))?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(id)
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;

        Ok(UserAccount::new(
            UserId::new(id),
            user.username,
            user.first_name,
            user.last_name,
            user.email,
            vec![user.role],
            true,
        ))
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn find_user(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserDirectoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
                SELECT id, username, first_name, last_name, email, active
                FROM users
                WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        match row {
            Some(row) => self.account_from_row(row).await.map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(name = "Validating user credentials in PostgreSQL", skip_all)]
    async fn verify_credentials(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<UserAccount, UserDirectoryError> {
        let row: Option<(i64, String, String, String, String, bool, String)> = sqlx::query_as(
            r#"
                SELECT id, username, first_name, last_name, email, active, password_hash
                FROM users
                WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some((id, username, first_name, last_name, email, active, password_hash)) = row else {
            return Err(UserDirectoryError::UserNotFound);
        };

        verify_password_hash(Secret::from(password_hash), password.clone())
            .await
            .map_err(|_| UserDirectoryError::InvalidCredentials)?;

        self.account_from_row((id, username, first_name, last_name, email, active))
            .await
    }
}
