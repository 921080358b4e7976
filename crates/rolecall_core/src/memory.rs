//! In-memory implementations of the store traits for testing.
//!
//! Both repositories keep their rows in a `HashMap` behind an `RwLock` and enforce
//! the same uniqueness rules as the PostgreSQL schema. All data is lost when the
//! repository is dropped.

use crate::{
    ConfigChanges, ConfigRepository, EntryField, EntryId, EntryRepository, GuildId,
    NewRoleEntry, RoleEntry, RoleId, SelectorConfig,
};
use async_trait::async_trait;
use rolecall_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory role entry table.
///
/// # Example
/// ```
/// use rolecall_core::{EntryRepository, InMemoryEntryRepository, NewRoleEntry, RoleId};
///
/// # async fn demo() {
/// let repo = InMemoryEntryRepository::new();
/// let id = repo
///     .insert(&NewRoleEntry {
///         role_id: RoleId(100),
///         emoji: "🔵".to_string(),
///         name: "Blue".to_string(),
///         description: "Blue team".to_string(),
///     })
///     .await
///     .unwrap();
/// assert_eq!(repo.fetch_by_ids(&[id]).await.unwrap().len(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryEntryRepository {
    entries: Arc<RwLock<HashMap<EntryId, RoleEntry>>>,
    next_id: Arc<RwLock<EntryId>>,
    fail_deletes: Arc<AtomicBool>,
}

impl InMemoryEntryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
            fail_deletes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make subsequent deletes fail (for testing).
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored entries (for testing).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the repository is empty (for testing).
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Delete a row behind the selector's back (for consistency-fault tests).
    pub async fn forget(&self, id: EntryId) {
        self.entries.write().await.remove(&id);
    }
}

impl Default for InMemoryEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate(constraint: &str) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::DuplicateKey(constraint.to_string()))
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn insert(&self, entry: &NewRoleEntry) -> DatabaseResult<EntryId> {
        let mut entries = self.entries.write().await;

        if entries.values().any(|e| e.role_id == entry.role_id) {
            return Err(duplicate("role_entries_role_id_key"));
        }
        if entries.values().any(|e| e.emoji == entry.emoji) {
            return Err(duplicate("role_entries_emoji_key"));
        }

        let mut next_id = self.next_id.write().await;
        let id = *next_id;
        *next_id += 1;

        entries.insert(
            id,
            RoleEntry {
                id,
                role_id: entry.role_id,
                emoji: entry.emoji.clone(),
                name: entry.name.clone(),
                description: entry.description.clone(),
            },
        );
        Ok(id)
    }

    async fn delete(&self, id: EntryId) -> DatabaseResult<bool> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DatabaseError::new(DatabaseErrorKind::Query(
                "deletes disabled".to_string(),
            )));
        }
        Ok(self.entries.write().await.remove(&id).is_some())
    }

    async fn update_field(
        &self,
        id: EntryId,
        field: EntryField,
        value: &str,
    ) -> DatabaseResult<bool> {
        let mut entries = self.entries.write().await;

        if field == EntryField::Emoji
            && entries.values().any(|e| e.id != id && e.emoji == value)
        {
            return Err(duplicate("role_entries_emoji_key"));
        }

        match entries.get_mut(&id) {
            Some(entry) => {
                *entry = entry.with_field(field, value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn fetch_by_ids(&self, ids: &[EntryId]) -> DatabaseResult<Vec<RoleEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn find_by_role(
        &self,
        role_id: RoleId,
        among: &[EntryId],
    ) -> DatabaseResult<Option<RoleEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .find(|e| e.role_id == role_id && among.contains(&e.id))
            .cloned())
    }

    async fn find_by_emoji(
        &self,
        emoji: &str,
        among: &[EntryId],
    ) -> DatabaseResult<Option<RoleEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .find(|e| e.emoji == emoji && among.contains(&e.id))
            .cloned())
    }

    async fn count(&self) -> DatabaseResult<i64> {
        Ok(self.entries.read().await.len() as i64)
    }
}

/// In-memory selector config table.
///
/// `fail_writes` makes every write return a query error, which lets tests check
/// that a failed commit leaves the live config untouched.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigRepository {
    configs: Arc<RwLock<HashMap<GuildId, SelectorConfig>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryConfigRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (for testing).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored row for `guild_id` (for testing).
    pub async fn stored(&self, guild_id: GuildId) -> Option<SelectorConfig> {
        self.configs.read().await.get(&guild_id).cloned()
    }

    fn check_writable(&self) -> DatabaseResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DatabaseError::new(DatabaseErrorKind::Query(
                "writes disabled".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for InMemoryConfigRepository {
    async fn load_all(&self) -> DatabaseResult<Vec<SelectorConfig>> {
        Ok(self.configs.read().await.values().cloned().collect())
    }

    async fn insert_default(&self, guild_id: GuildId) -> DatabaseResult<SelectorConfig> {
        self.check_writable()?;
        let mut configs = self.configs.write().await;
        Ok(configs
            .entry(guild_id)
            .or_insert_with(|| SelectorConfig::new(guild_id))
            .clone())
    }

    async fn apply(&self, guild_id: GuildId, changes: &ConfigChanges) -> DatabaseResult<()> {
        self.check_writable()?;
        let mut configs = self.configs.write().await;
        let config = configs
            .get_mut(&guild_id)
            .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))?;
        config.apply(changes);
        Ok(())
    }
}
