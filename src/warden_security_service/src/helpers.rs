use sqlx::{PgPool, postgres::PgPoolOptions};
use warden_adapters::PostgresUserDirectory;

/// Connect to PostgreSQL and run pending migrations.
///
/// # Returns
/// A user directory backed by the migrated database
pub async fn configure_postgresql(url: &str) -> Result<PostgresUserDirectory, sqlx::Error> {
    let pg_pool = get_postgres_pool(url).await?;

    let directory = PostgresUserDirectory::new(pg_pool);
    directory.migrate().await?;

    Ok(directory)
}

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `url` - Database connection URL
pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}
