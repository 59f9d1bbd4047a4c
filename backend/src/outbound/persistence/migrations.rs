//! Embedded schema migrations.
//!
//! Migrations under `backend/migrations` are compiled into the binary and
//! applied at startup when `run_migrations` is enabled. Diesel's migration
//! harness is synchronous, so it runs on the blocking pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Embedded migrations from the backend/migrations directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    #[error("migration task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Apply every pending migration and return how many ran.
///
/// # Errors
///
/// Returns [`MigrationError`] if the database is unreachable or a migration
/// fails; the failing migration is rolled back by Diesel.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let database_url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || -> Result<usize, MigrationError> {
        let mut conn = PgConnection::establish(&database_url)?;
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        Ok(versions.len())
    })
    .await??;

    info!(applied, "database migrations up to date");
    Ok(applied)
}
