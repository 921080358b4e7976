//! PostgreSQL selector config repository.

use crate::models::{SelectorConfigChangeset, SelectorConfigRow};
use crate::schema::selector_configs;
use crate::{PgPool, with_conn};
use async_trait::async_trait;
use diesel::prelude::*;
use rolecall_core::{ConfigChanges, ConfigRepository, GuildId, SelectorConfig};
use rolecall_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use tracing::{debug, info, instrument};

/// Selector configs stored in the `selector_configs` table.
#[derive(Debug, Clone)]
pub struct PgConfigRepository {
    pool: PgPool,
}

impl PgConfigRepository {
    /// Create a repository over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigRepository for PgConfigRepository {
    #[instrument(skip(self))]
    async fn load_all(&self) -> DatabaseResult<Vec<SelectorConfig>> {
        let rows = with_conn(&self.pool, |conn| {
            selector_configs::table
                .select(SelectorConfigRow::as_select())
                .load(conn)
                .map_err(Into::into)
        })
        .await?;

        info!(count = rows.len(), "Loaded selector configs");
        Ok(rows.into_iter().map(SelectorConfig::from).collect())
    }

    #[instrument(skip(self))]
    async fn insert_default(&self, guild_id: GuildId) -> DatabaseResult<SelectorConfig> {
        let row = SelectorConfigRow::from(&SelectorConfig::new(guild_id));
        let stored = with_conn(&self.pool, move |conn| {
            diesel::insert_into(selector_configs::table)
                .values(&row)
                .on_conflict(selector_configs::guild_id)
                .do_nothing()
                .execute(conn)?;

            selector_configs::table
                .find(row.guild_id)
                .select(SelectorConfigRow::as_select())
                .first(conn)
                .map_err(DatabaseError::from)
        })
        .await?;

        debug!("Selector config ensured");
        Ok(stored.into())
    }

    #[instrument(skip(self, changes))]
    async fn apply(&self, guild_id: GuildId, changes: &ConfigChanges) -> DatabaseResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let changeset = SelectorConfigChangeset::from(changes);
        let updated = with_conn(&self.pool, move |conn| {
            diesel::update(selector_configs::table.find(guild_id.to_db()))
                .set(&changeset)
                .execute(conn)
                .map_err(DatabaseError::from)
        })
        .await?;

        if updated == 0 {
            return Err(DatabaseError::new(DatabaseErrorKind::NotFound));
        }

        debug!("Applied selector config changes");
        Ok(())
    }
}
