//! Moderator commands for managing a guild's selector.

use crate::{
    ConfigRegistry, Direction, EntryStore, OrderEditor, PublishReport, SelectorPublisher,
};
use derive_getters::Getters;
use derive_setters::Setters;
use rolecall_core::{
    ChannelId, EntryField, Gateway, GuildId, GuildRole, MessageId, RoleEntry, RoleId,
};
use rolecall_error::{SelectorError, SelectorErrorKind, SelectorResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Settings shared by the command surface and the reaction path.
///
/// # Examples
///
/// ```
/// use rolecall_core::RoleId;
/// use rolecall_selector::SelectorSettings;
/// use std::time::Duration;
///
/// let settings = SelectorSettings::default()
///     .with_moderator_role_id(Some(RoleId(42)))
///     .with_notice_ttl(Duration::from_secs(5));
/// assert_eq!(*settings.notice_ttl(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct SelectorSettings {
    /// Role that may never be offered on the selector
    moderator_role_id: Option<RoleId>,
    /// How long notices stay visible
    notice_ttl: Duration,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            moderator_role_id: None,
            notice_ttl: Duration::from_secs(10),
        }
    }
}

/// The `roles` command group.
///
/// Each mutating command locks the guild's config, edits a draft, and commits it.
/// Replies are the confirmation text; errors carry their own user message via
/// [`SelectorError::user_message`].
pub struct SelectorCommands {
    registry: Arc<ConfigRegistry>,
    entries: EntryStore,
    publisher: SelectorPublisher,
    gateway: Arc<dyn Gateway>,
    settings: SelectorSettings,
}

impl SelectorCommands {
    /// Create the command surface.
    pub fn new(
        registry: Arc<ConfigRegistry>,
        entries: EntryStore,
        gateway: Arc<dyn Gateway>,
        settings: SelectorSettings,
    ) -> Self {
        let publisher = SelectorPublisher::new(entries.clone(), gateway.clone());
        Self {
            registry,
            entries,
            publisher,
            gateway,
            settings,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &SelectorSettings {
        &self.settings
    }

    /// Publish a fresh selector in `channel_id`, replacing the old one.
    ///
    /// The old message is deleted only after the new location is committed. If
    /// the commit fails the new message is deleted instead and the old selector
    /// stays live. The invoking command message, if given, is deleted best
    /// effort once the selector is published.
    #[instrument(skip(self))]
    pub async fn spawn(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        invoking: Option<MessageId>,
    ) -> SelectorResult<PublishReport> {
        let mut live = self.registry.get_or_create(guild_id).await?;
        let mut draft = live.clone();
        let report = self.publisher.publish(&mut draft, channel_id).await?;

        if let Err(e) = self.registry.commit(&mut live, draft).await {
            self.publisher.discard(&report).await;
            return Err(e);
        }
        drop(live);
        self.publisher.retire(&report).await;

        if let Some(message_id) = invoking
            && let Err(e) = self.gateway.delete_message(channel_id, message_id).await
        {
            warn!(error = %e, "Could not delete command message");
        }
        Ok(report)
    }

    /// Register a role and append it to the selector.
    #[instrument(skip(self, name, description))]
    pub async fn add(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        emoji: &str,
        name: &str,
        description: &str,
    ) -> SelectorResult<String> {
        if self.settings.moderator_role_id == Some(role_id) {
            return Err(SelectorError::validation(
                "role",
                "Moderator/mute role can't be added to the roles selector.",
            ));
        }

        let mut live = self.registry.get_or_create(guild_id).await?;
        let entry_id = self.entries.add(role_id, emoji, name, description).await?;

        let mut draft = live.clone();
        let appended = match OrderEditor::append(&mut draft, entry_id) {
            Ok(()) => self.registry.commit(&mut live, draft).await,
            Err(e) => Err(e),
        };

        if let Err(e) = appended {
            if let Err(rollback) = self.entries.remove(entry_id).await {
                warn!(entry_id, error = %rollback, "Could not roll back role entry");
            }
            return Err(e);
        }

        info!(entry_id, "Role added to selector");
        Ok("Role added. Do `roles spawn` to create new role selector menu.".to_string())
    }

    /// Remove a role from the selector and delete its entry.
    #[instrument(skip(self))]
    pub async fn remove(&self, guild_id: GuildId, role_id: RoleId) -> SelectorResult<String> {
        let mut live = self.registry.get_or_create(guild_id).await?;
        let entry = self
            .entries
            .find_by_role(role_id, live.roles())
            .await?
            .ok_or_else(|| not_found("Role not in the role selector."))?;

        let index = live.position(entry.id);
        let mut draft = live.clone();
        OrderEditor::remove(&mut draft, entry.id)?;
        self.registry.commit(&mut live, draft).await?;

        if let Err(e) = self.entries.remove(entry.id).await {
            let mut restore = live.clone();
            let index = index.unwrap_or(restore.roles().len());
            restore.roles_mut().insert(index, entry.id);
            if let Err(rollback) = self.registry.commit(&mut live, restore).await {
                warn!(entry_id = entry.id, error = %rollback, "Could not restore removed role");
            }
            return Err(e);
        }
        drop(live);

        let purged = self.registry.purge_entry(entry.id).await?;
        info!(entry_id = entry.id, purged, "Role removed from selector");

        Ok("Role removed from the role selector.".to_string())
    }

    /// Change the emoji, name, or description of a listed role.
    #[instrument(skip(self, value))]
    pub async fn edit(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        field: &str,
        value: &str,
    ) -> SelectorResult<String> {
        let field: EntryField = field.parse().map_err(|_| {
            SelectorError::validation(
                "field",
                format!("Sorry, '{}' is not a valid field.", field.to_lowercase()),
            )
        })?;

        let mut live = self.registry.get_or_create(guild_id).await?;
        let entry = self
            .entries
            .find_by_role(role_id, live.roles())
            .await?
            .ok_or_else(|| {
                not_found(&format!(
                    "Role with id {role_id} is not set up in the role selector yet."
                ))
            })?;

        let mut draft = live.clone();
        OrderEditor::edit_field(&self.entries, &mut draft, entry.id, field, value).await?;
        self.registry.commit(&mut live, draft).await?;

        Ok("Value updated. Respawn role selector for updated version.".to_string())
    }

    /// Flip whether selector fields render inline.
    #[instrument(skip(self))]
    pub async fn inline(&self, guild_id: GuildId) -> SelectorResult<String> {
        let mut live = self.registry.get_or_create(guild_id).await?;
        let mut draft = live.clone();
        draft.set_inline(!*live.inline());
        self.registry.commit(&mut live, draft).await?;

        let state = if *live.inline() { "enabled" } else { "disabled" };
        Ok(format!("Inline fields {state}."))
    }

    /// Move a role one step up.
    pub async fn move_up(&self, guild_id: GuildId, role_id: RoleId) -> SelectorResult<String> {
        self.move_role(guild_id, role_id, Direction::Up).await?;
        Ok("Role moved up.".to_string())
    }

    /// Move a role one step down.
    pub async fn move_down(&self, guild_id: GuildId, role_id: RoleId) -> SelectorResult<String> {
        self.move_role(guild_id, role_id, Direction::Down).await?;
        Ok("Role moved down.".to_string())
    }

    #[instrument(skip(self))]
    async fn move_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        direction: Direction,
    ) -> SelectorResult<()> {
        let mut live = self.registry.get_or_create(guild_id).await?;
        let entry = self
            .entries
            .find_by_role(role_id, live.roles())
            .await?
            .ok_or_else(|| not_found("Role not registered."))?;

        let mut draft = live.clone();
        OrderEditor::move_entry(&mut draft, entry.id, direction)?;
        self.registry.commit(&mut live, draft).await
    }

    /// Entries in selector order.
    ///
    /// Ids without an entry are skipped here so a moderator can still inspect a
    /// damaged selector.
    #[instrument(skip(self))]
    pub async fn print(&self, guild_id: GuildId) -> SelectorResult<Vec<RoleEntry>> {
        let config = match self.registry.snapshot(guild_id).await {
            Some(config) => config,
            None => self.registry.get_or_create(guild_id).await?.clone(),
        };

        let mut found = self.entries.list_by_ids(config.roles()).await?;
        if found.is_empty() {
            return Err(not_found("No roles registered or found."));
        }

        let ordered = config
            .roles()
            .iter()
            .filter_map(|id| {
                let index = found.iter().position(|entry| entry.id == *id)?;
                Some(found.swap_remove(index))
            })
            .collect();
        Ok(ordered)
    }

    /// Every role on the guild, highest first, without `@everyone`.
    #[instrument(skip(self))]
    pub async fn list(&self, guild_id: GuildId) -> SelectorResult<Vec<GuildRole>> {
        let mut roles: Vec<_> = self
            .gateway
            .guild_roles(guild_id)
            .await?
            .into_iter()
            .filter(|role| role.id.get() != guild_id.get())
            .collect();
        roles.sort_by(|a, b| b.position.cmp(&a.position));
        Ok(roles)
    }
}

#[track_caller]
fn not_found(message: &str) -> SelectorError {
    SelectorError::new(SelectorErrorKind::NotFound(message.to_string()))
}
