//! Durable store collaborators.

use crate::{ConfigChanges, EntryField, EntryId, GuildId, NewRoleEntry, RoleEntry, RoleId, SelectorConfig};
use async_trait::async_trait;
use rolecall_error::DatabaseResult;

/// Role entry table.
///
/// Inserts enforce uniqueness of `role_id` and `emoji`; violations surface as
/// `DatabaseErrorKind::DuplicateKey`. Lookups restricted by `among` correspond
/// to `WHERE ... AND id = ANY(among)`.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Insert a row and return its surrogate id.
    async fn insert(&self, entry: &NewRoleEntry) -> DatabaseResult<EntryId>;

    /// Delete a row. Returns whether a row was removed.
    async fn delete(&self, id: EntryId) -> DatabaseResult<bool>;

    /// Overwrite one field. Returns whether a row was updated.
    async fn update_field(&self, id: EntryId, field: EntryField, value: &str)
    -> DatabaseResult<bool>;

    /// Rows whose id is in `ids`, in no particular order.
    async fn fetch_by_ids(&self, ids: &[EntryId]) -> DatabaseResult<Vec<RoleEntry>>;

    /// The row for `role_id`, if its id is in `among`.
    async fn find_by_role(
        &self,
        role_id: RoleId,
        among: &[EntryId],
    ) -> DatabaseResult<Option<RoleEntry>>;

    /// The row triggered by `emoji`, if its id is in `among`.
    async fn find_by_emoji(&self, emoji: &str, among: &[EntryId])
    -> DatabaseResult<Option<RoleEntry>>;

    /// Total number of rows.
    async fn count(&self) -> DatabaseResult<i64>;
}

/// Selector config table, keyed by guild.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Every persisted config, for startup hydration.
    async fn load_all(&self) -> DatabaseResult<Vec<SelectorConfig>>;

    /// Insert the default row for `guild_id` unless one exists, then return the
    /// stored row.
    async fn insert_default(&self, guild_id: GuildId) -> DatabaseResult<SelectorConfig>;

    /// Write exactly the fields present in `changes`, atomically.
    async fn apply(&self, guild_id: GuildId, changes: &ConfigChanges) -> DatabaseResult<()>;
}
