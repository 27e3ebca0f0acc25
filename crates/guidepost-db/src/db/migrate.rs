//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{DbError, DbResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// ## Summary
/// Runs any pending migrations over a dedicated synchronous connection.
/// Intended to be called once at startup, before the async pool is used.
///
/// ## Errors
/// Returns an error if the connection cannot be established or a
/// migration fails.
#[tracing::instrument(skip(database_url))]
pub fn run_pending_migrations(database_url: &str) -> DbResult<usize> {
    let mut conn = PgConnection::establish(database_url)?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    if applied.is_empty() {
        tracing::debug!("Schema is up to date");
    } else {
        tracing::info!(count = applied.len(), "Applied pending migrations");
    }

    Ok(applied.len())
}
