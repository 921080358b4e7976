//! Connection pool and migrations.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rolecall_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use tracing::{info, instrument};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pooled PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Build a connection pool and check out one connection to fail fast.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or the first connection fails.
#[instrument(skip(database_url))]
pub fn establish_pool(database_url: &str, pool_size: u32) -> DatabaseResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

    // Warm up the pool
    drop(pool.get()?);

    info!(pool_size, "Database pool ready");
    Ok(pool)
}

/// Run pending migrations.
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;

    info!(count = applied.len(), "Applied pending migrations");
    Ok(())
}
