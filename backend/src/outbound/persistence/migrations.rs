//! Embedded schema migrations, run once at startup.
//!
//! The only migration creates the `emails` table if it does not exist, so a
//! fresh database is usable without external tooling.

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::domain::ports::EmailRepositoryError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run all pending migrations against `database_url`.
///
/// Uses a dedicated synchronous connection; the async pool never sees
/// migration traffic.
///
/// # Errors
///
/// Returns a connection error when the database is unreachable and a query
/// error when a migration fails to apply.
pub fn run_pending(database_url: &str) -> Result<(), EmailRepositoryError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| EmailRepositoryError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| EmailRepositoryError::query(err.to_string()))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}
