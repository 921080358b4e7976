//! PostgreSQL role entry repository.

use crate::models::{NewRoleEntryRow, RoleEntryRow};
use crate::schema::role_entries;
use crate::{PgPool, with_conn};
use async_trait::async_trait;
use diesel::prelude::*;
use rolecall_core::{EntryField, EntryId, EntryRepository, NewRoleEntry, RoleEntry, RoleId};
use rolecall_error::DatabaseResult;
use tracing::{debug, instrument};

/// Role entries stored in the `role_entries` table.
///
/// Uniqueness of `role_id` and `emoji` is enforced by the table's unique
/// constraints; violations come back as `DatabaseErrorKind::DuplicateKey`.
#[derive(Debug, Clone)]
pub struct PgEntryRepository {
    pool: PgPool,
}

impl PgEntryRepository {
    /// Create a repository over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    #[instrument(skip(self, entry), fields(role_id = %entry.role_id))]
    async fn insert(&self, entry: &NewRoleEntry) -> DatabaseResult<EntryId> {
        let row = NewRoleEntryRow::from(entry);
        let id = with_conn(&self.pool, move |conn| {
            diesel::insert_into(role_entries::table)
                .values(&row)
                .returning(role_entries::id)
                .get_result::<i32>(conn)
                .map_err(Into::into)
        })
        .await?;

        debug!(entry_id = id, "Inserted role entry");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: EntryId) -> DatabaseResult<bool> {
        with_conn(&self.pool, move |conn| {
            let deleted = diesel::delete(role_entries::table.find(id)).execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }

    #[instrument(skip(self, value))]
    async fn update_field(
        &self,
        id: EntryId,
        field: EntryField,
        value: &str,
    ) -> DatabaseResult<bool> {
        let value = value.to_string();
        with_conn(&self.pool, move |conn| {
            let target = diesel::update(role_entries::table.find(id));
            let updated = match field {
                EntryField::Emoji => target.set(role_entries::emoji.eq(&value)).execute(conn)?,
                EntryField::Name => target.set(role_entries::name.eq(&value)).execute(conn)?,
                EntryField::Description => target
                    .set(role_entries::description.eq(&value))
                    .execute(conn)?,
            };
            Ok(updated > 0)
        })
        .await
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn fetch_by_ids(&self, ids: &[EntryId]) -> DatabaseResult<Vec<RoleEntry>> {
        let ids = ids.to_vec();
        let rows = with_conn(&self.pool, move |conn| {
            role_entries::table
                .filter(role_entries::id.eq_any(ids))
                .select(RoleEntryRow::as_select())
                .load(conn)
                .map_err(Into::into)
        })
        .await?;

        Ok(rows.into_iter().map(RoleEntry::from).collect())
    }

    #[instrument(skip(self, among))]
    async fn find_by_role(
        &self,
        role_id: RoleId,
        among: &[EntryId],
    ) -> DatabaseResult<Option<RoleEntry>> {
        let among = among.to_vec();
        let row = with_conn(&self.pool, move |conn| {
            role_entries::table
                .filter(role_entries::role_id.eq(role_id.to_db()))
                .filter(role_entries::id.eq_any(among))
                .select(RoleEntryRow::as_select())
                .first(conn)
                .optional()
                .map_err(Into::into)
        })
        .await?;

        Ok(row.map(RoleEntry::from))
    }

    #[instrument(skip(self, among))]
    async fn find_by_emoji(
        &self,
        emoji: &str,
        among: &[EntryId],
    ) -> DatabaseResult<Option<RoleEntry>> {
        let emoji = emoji.to_string();
        let among = among.to_vec();
        let row = with_conn(&self.pool, move |conn| {
            role_entries::table
                .filter(role_entries::emoji.eq(emoji))
                .filter(role_entries::id.eq_any(among))
                .select(RoleEntryRow::as_select())
                .first(conn)
                .optional()
                .map_err(Into::into)
        })
        .await?;

        Ok(row.map(RoleEntry::from))
    }

    async fn count(&self) -> DatabaseResult<i64> {
        with_conn(&self.pool, |conn| {
            role_entries::table
                .count()
                .get_result(conn)
                .map_err(Into::into)
        })
        .await
    }
}
