//! PostgreSQL storage for Rolecall.
//!
//! This crate provides the diesel schema, row models, and repository
//! implementations of [`rolecall_core::EntryRepository`] and
//! [`rolecall_core::ConfigRepository`] backed by an r2d2 connection pool.
//!
//! # Example
//!
//! ```rust,ignore
//! use rolecall_database::{PgConfigRepository, PgEntryRepository, establish_pool, run_migrations};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = establish_pool(&std::env::var("DATABASE_URL")?, 10)?;
//! run_migrations(&mut pool.get()?)?;
//!
//! let entries = PgEntryRepository::new(pool.clone());
//! let configs = PgConfigRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod config_repository;
mod connection;
mod entry_repository;
mod models;

pub mod schema;

pub use config_repository::PgConfigRepository;
pub use connection::{PgPool, establish_pool, run_migrations};
pub use entry_repository::PgEntryRepository;
pub use models::{NewRoleEntryRow, RoleEntryRow, SelectorConfigChangeset, SelectorConfigRow};

use rolecall_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};

/// Run a blocking diesel call on the blocking thread pool with a pooled connection.
pub(crate) async fn with_conn<T, F>(pool: &PgPool, f: F) -> DatabaseResult<T>
where
    F: FnOnce(&mut diesel::pg::PgConnection) -> DatabaseResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| DatabaseError::new(DatabaseErrorKind::Task(e.to_string())))?
}
