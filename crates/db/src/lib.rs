//! SQLite access layer: pool construction, migrations, models, and
//! repositories for the `generations` table.

pub mod models;
pub mod repositories;

use sqlx::sqlite::SqlitePoolOptions;

/// Shared connection pool type used across the workspace.
pub type DbPool = sqlx::SqlitePool;

/// Embedded migrations, applied at startup and by `#[sqlx::test]`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool for the given SQLite URL.
///
/// The demo is single-process and write-light, so a small pool is plenty.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
