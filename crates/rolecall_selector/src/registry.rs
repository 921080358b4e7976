//! Process-wide registry of selector configs.

use rolecall_core::{
    ConfigField, ConfigRepository, EntryId, EntryRepository, GuildId, SelectorConfig,
};
use rolecall_error::{SelectorError, SelectorErrorKind, SelectorResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, instrument, warn};

/// Exclusive access to one guild's live config.
pub type ConfigGuard = OwnedMutexGuard<SelectorConfig>;

/// Every guild's selector config, hydrated once at startup.
///
/// Each guild has its own async mutex: holding a [`ConfigGuard`] makes the caller
/// the single writer for that guild, while other guilds proceed in parallel.
///
/// Writes follow a draft/commit cycle:
///
/// ```rust,ignore
/// let mut live = registry.get_or_create(guild_id).await?;
/// let mut draft = live.clone();
/// OrderEditor::move_entry(&mut draft, entry_id, Direction::Down)?;
/// registry.commit(&mut live, draft).await?;
/// ```
pub struct ConfigRegistry {
    configs: Arc<dyn ConfigRepository>,
    entries: Arc<dyn EntryRepository>,
    guilds: RwLock<HashMap<GuildId, Arc<Mutex<SelectorConfig>>>>,
}

impl ConfigRegistry {
    /// Create an empty registry. Call [`Self::hydrate`] before serving events.
    pub fn new(configs: Arc<dyn ConfigRepository>, entries: Arc<dyn EntryRepository>) -> Self {
        Self {
            configs,
            entries,
            guilds: RwLock::new(HashMap::new()),
        }
    }

    /// Load every persisted config into memory. Returns the number loaded.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> SelectorResult<usize> {
        let rows = self.configs.load_all().await?;
        let count = rows.len();

        let mut guilds = self.guilds.write().await;
        for config in rows {
            guilds.insert(*config.guild_id(), Arc::new(Mutex::new(config)));
        }

        info!(count, "Hydrated selector configs");
        Ok(count)
    }

    /// A copy of the guild's config, without creating one.
    ///
    /// Waits for any in-flight writer on the same guild, so the copy is always a
    /// committed state.
    pub async fn snapshot(&self, guild_id: GuildId) -> Option<SelectorConfig> {
        let slot = self.guilds.read().await.get(&guild_id).cloned()?;
        let config = slot.lock().await;
        Some(config.clone())
    }

    /// Lock the guild's config, creating and persisting a default first if the
    /// guild has none. Idempotent.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, guild_id: GuildId) -> SelectorResult<ConfigGuard> {
        let existing = self.guilds.read().await.get(&guild_id).cloned();
        if let Some(slot) = existing {
            return Ok(slot.lock_owned().await);
        }

        // The insert is idempotent, so racing creators may both run it; only the
        // first slot into the map is kept.
        let config = self.configs.insert_default(guild_id).await?;
        let slot = self
            .guilds
            .write()
            .await
            .entry(guild_id)
            .or_insert_with(|| {
                debug!("Created selector config");
                Arc::new(Mutex::new(config))
            })
            .clone();

        Ok(slot.lock_owned().await)
    }

    /// Persist the dirty fields of `draft` in one write, then install it as the
    /// live config.
    ///
    /// If `roles` is dirty the list is checked first: duplicates are a
    /// `Conflict`, ids that do not resolve are a `ConsistencyFault`. A checked
    /// list equal to the live one is not written. On any error `live` is left
    /// exactly as it was.
    #[instrument(skip(self, live, draft), fields(guild_id = %live.guild_id()))]
    pub async fn commit(
        &self,
        live: &mut SelectorConfig,
        mut draft: SelectorConfig,
    ) -> SelectorResult<()> {
        debug_assert_eq!(live.guild_id(), draft.guild_id());

        if draft.is_dirty(ConfigField::Roles) {
            self.check_roles(draft.roles()).await?;
        }

        let mut changes = draft.changes();
        if changes.roles.as_ref() == Some(live.roles()) {
            changes.roles = None;
        }
        if !changes.is_empty() {
            self.configs.apply(*draft.guild_id(), &changes).await?;
            debug!(
                fields = ?draft.dirty_fields().collect::<Vec<_>>(),
                "Committed selector config"
            );
        }

        draft.mark_clean();
        *live = draft;
        Ok(())
    }

    /// Remove `entry_id` from every config that still lists it.
    ///
    /// Must not be called while holding a [`ConfigGuard`].
    #[instrument(skip(self))]
    pub async fn purge_entry(&self, entry_id: EntryId) -> SelectorResult<usize> {
        let slots: Vec<_> = self.guilds.read().await.values().cloned().collect();

        let mut purged = 0;
        for slot in slots {
            let mut live = slot.lock_owned().await;
            if !live.contains(entry_id) {
                continue;
            }
            let mut draft = live.clone();
            draft.roles_mut().retain(|id| *id != entry_id);
            self.commit(&mut live, draft).await?;
            warn!(guild_id = %live.guild_id(), "Purged dangling entry from selector");
            purged += 1;
        }
        Ok(purged)
    }

    /// Guild ids currently known.
    pub async fn guild_ids(&self) -> Vec<GuildId> {
        self.guilds.read().await.keys().copied().collect()
    }

    async fn check_roles(&self, roles: &[EntryId]) -> SelectorResult<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = roles.iter().find(|id| !seen.insert(**id)) {
            return Err(SelectorError::new(SelectorErrorKind::Conflict(format!(
                "Entry {dup} appears twice in the role selector."
            ))));
        }

        let found: HashSet<EntryId> = self
            .entries
            .fetch_by_ids(roles)
            .await?
            .into_iter()
            .map(|entry| entry.id)
            .collect();

        match roles.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(SelectorError::new(SelectorErrorKind::ConsistencyFault(
                *missing,
            ))),
            None => Ok(()),
        }
    }
}
