//! Per-guild selector configuration with explicit dirty tracking.
//!
//! A [`SelectorConfig`] is always mutated read-modify-write: setters record which
//! fields changed, and [`SelectorConfig::changes`] turns that record into a
//! [`ConfigChanges`] diff that a store applies in a single write. Fields that were
//! not touched are absent from the diff, so two drafts that changed unrelated
//! fields never revert each other.

use crate::{ChannelId, EntryId, GuildId, MessageId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persisted attributes of a selector config that can be marked dirty.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigField {
    /// The ordered entry id list
    Roles,
    /// Whether embed fields render inline
    Inline,
    /// Channel of the published selector
    ChannelId,
    /// Message id of the published selector
    MessageId,
}

/// One guild's selector.
///
/// # Examples
///
/// ```
/// use rolecall_core::{ConfigField, GuildId, SelectorConfig};
///
/// let mut config = SelectorConfig::new(GuildId(1));
/// assert!(config.is_clean());
///
/// config.set_inline(false);
/// assert!(config.is_dirty(ConfigField::Inline));
/// assert_eq!(config.changes().inline, Some(false));
/// assert_eq!(config.changes().roles, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SelectorConfig {
    guild_id: GuildId,
    roles: Vec<EntryId>,
    inline: bool,
    channel_id: Option<ChannelId>,
    message_id: Option<MessageId>,
    #[serde(skip)]
    #[getter(skip)]
    dirty: BTreeSet<ConfigField>,
}

impl SelectorConfig {
    /// Default config for a guild: no roles, inline fields, never published.
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            roles: Vec::new(),
            inline: true,
            channel_id: None,
            message_id: None,
            dirty: BTreeSet::new(),
        }
    }

    /// Rebuild a clean config from persisted values.
    pub fn from_parts(
        guild_id: GuildId,
        roles: Vec<EntryId>,
        inline: bool,
        channel_id: Option<ChannelId>,
        message_id: Option<MessageId>,
    ) -> Self {
        Self {
            guild_id,
            roles,
            inline,
            channel_id,
            message_id,
            dirty: BTreeSet::new(),
        }
    }

    /// Mutable access to the ordered list; marks `roles` dirty.
    pub fn roles_mut(&mut self) -> &mut Vec<EntryId> {
        self.mark_dirty(ConfigField::Roles);
        &mut self.roles
    }

    /// Replace the ordered list.
    pub fn set_roles(&mut self, roles: Vec<EntryId>) {
        self.roles = roles;
        self.mark_dirty(ConfigField::Roles);
    }

    /// Set the inline flag.
    pub fn set_inline(&mut self, inline: bool) {
        self.inline = inline;
        self.mark_dirty(ConfigField::Inline);
    }

    /// Record where the selector is now published.
    pub fn set_published(&mut self, channel_id: ChannelId, message_id: MessageId) {
        self.channel_id = Some(channel_id);
        self.message_id = Some(message_id);
        self.mark_dirty(ConfigField::ChannelId);
        self.mark_dirty(ConfigField::MessageId);
    }

    /// Whether `entry_id` is in the ordered list.
    pub fn contains(&self, entry_id: EntryId) -> bool {
        self.roles.contains(&entry_id)
    }

    /// Position of `entry_id` in the ordered list.
    pub fn position(&self, entry_id: EntryId) -> Option<usize> {
        self.roles.iter().position(|id| *id == entry_id)
    }

    /// Whether a reaction on this channel/message targets the published selector.
    pub fn is_published_at(&self, channel_id: ChannelId, message_id: MessageId) -> bool {
        self.channel_id == Some(channel_id) && self.message_id == Some(message_id)
    }

    /// Explicitly mark a field changed.
    pub fn mark_dirty(&mut self, field: ConfigField) {
        self.dirty.insert(field);
    }

    /// Whether `field` changed since the last load or commit.
    pub fn is_dirty(&self, field: ConfigField) -> bool {
        self.dirty.contains(&field)
    }

    /// Whether nothing changed since the last load or commit.
    pub fn is_clean(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Fields changed since the last load or commit.
    pub fn dirty_fields(&self) -> impl Iterator<Item = ConfigField> + '_ {
        self.dirty.iter().copied()
    }

    /// Clear dirty markers after a successful write.
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    /// The diff holding exactly the dirty fields.
    pub fn changes(&self) -> ConfigChanges {
        let mut changes = ConfigChanges::default();
        for field in &self.dirty {
            match field {
                ConfigField::Roles => changes.roles = Some(self.roles.clone()),
                ConfigField::Inline => changes.inline = Some(self.inline),
                ConfigField::ChannelId => changes.channel_id = Some(self.channel_id),
                ConfigField::MessageId => changes.message_id = Some(self.message_id),
            }
        }
        changes
    }

    /// Apply a diff produced elsewhere (store side of a partial write).
    pub fn apply(&mut self, changes: &ConfigChanges) {
        if let Some(roles) = &changes.roles {
            self.roles = roles.clone();
        }
        if let Some(inline) = changes.inline {
            self.inline = inline;
        }
        if let Some(channel_id) = changes.channel_id {
            self.channel_id = channel_id;
        }
        if let Some(message_id) = changes.message_id {
            self.message_id = message_id;
        }
    }
}

/// A partial update: `None` leaves the stored value untouched.
///
/// The nullable columns use `Option<Option<_>>` so "set to null" and "leave alone"
/// stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    /// New ordered list
    pub roles: Option<Vec<EntryId>>,
    /// New inline flag
    pub inline: Option<bool>,
    /// New channel id
    pub channel_id: Option<Option<ChannelId>>,
    /// New message id
    pub message_id: Option<Option<MessageId>>,
}

impl ConfigChanges {
    /// Whether the diff writes nothing.
    pub fn is_empty(&self) -> bool {
        self.roles.is_none()
            && self.inline.is_none()
            && self.channel_id.is_none()
            && self.message_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = SelectorConfig::new(GuildId(5));
        assert!(config.roles().is_empty());
        assert!(*config.inline());
        assert_eq!(*config.message_id(), None);
        assert!(config.is_clean());
        assert!(config.changes().is_empty());
    }

    #[test]
    fn test_changes_only_carry_dirty_fields() {
        let mut config = SelectorConfig::from_parts(GuildId(5), vec![1, 2], true, None, None);
        config.roles_mut().push(3);

        let changes = config.changes();
        assert_eq!(changes.roles, Some(vec![1, 2, 3]));
        assert_eq!(changes.inline, None);
        assert_eq!(changes.channel_id, None);
    }

    #[test]
    fn test_unrelated_partial_writes_do_not_clobber() {
        let stored = SelectorConfig::from_parts(GuildId(5), vec![1, 2], true, None, None);

        let mut reorder = stored.clone();
        reorder.set_roles(vec![2, 1]);
        let mut toggle = stored.clone();
        toggle.set_inline(false);

        let mut merged = stored.clone();
        merged.apply(&reorder.changes());
        merged.apply(&toggle.changes());

        assert_eq!(merged.roles(), &vec![2, 1]);
        assert!(!*merged.inline());
    }

    #[test]
    fn test_set_published_marks_both_location_fields() {
        let mut config = SelectorConfig::new(GuildId(5));
        config.set_published(ChannelId(10), MessageId(20));

        assert!(config.is_dirty(ConfigField::ChannelId));
        assert!(config.is_dirty(ConfigField::MessageId));
        assert!(config.is_published_at(ChannelId(10), MessageId(20)));
        assert!(!config.is_published_at(ChannelId(10), MessageId(21)));

        config.mark_clean();
        assert!(config.is_clean());
    }
}
