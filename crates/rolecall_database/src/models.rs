//! Row models for the role selector tables.

use crate::schema::{role_entries, selector_configs};
use diesel::prelude::*;
use rolecall_core::{
    ChannelId, ConfigChanges, GuildId, MessageId, NewRoleEntry, RoleEntry, RoleId, SelectorConfig,
};

/// Database row for `role_entries`.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = role_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoleEntryRow {
    pub id: i32,
    pub role_id: i64,
    pub emoji: String,
    pub name: String,
    pub description: String,
}

impl From<RoleEntryRow> for RoleEntry {
    fn from(row: RoleEntryRow) -> Self {
        RoleEntry {
            id: row.id,
            role_id: RoleId::from_db(row.role_id),
            emoji: row.emoji,
            name: row.name,
            description: row.description,
        }
    }
}

/// Insertable struct for `role_entries`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = role_entries)]
pub struct NewRoleEntryRow {
    pub role_id: i64,
    pub emoji: String,
    pub name: String,
    pub description: String,
}

impl From<&NewRoleEntry> for NewRoleEntryRow {
    fn from(entry: &NewRoleEntry) -> Self {
        Self {
            role_id: entry.role_id.to_db(),
            emoji: entry.emoji.clone(),
            name: entry.name.clone(),
            description: entry.description.clone(),
        }
    }
}

/// Database row for `selector_configs`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = selector_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SelectorConfigRow {
    pub guild_id: i64,
    pub roles: Vec<i32>,
    pub inline: bool,
    pub channel_id: Option<i64>,
    pub message_id: Option<i64>,
}

impl From<SelectorConfigRow> for SelectorConfig {
    fn from(row: SelectorConfigRow) -> Self {
        SelectorConfig::from_parts(
            GuildId::from_db(row.guild_id),
            row.roles,
            row.inline,
            row.channel_id.map(ChannelId::from_db),
            row.message_id.map(MessageId::from_db),
        )
    }
}

impl From<&SelectorConfig> for SelectorConfigRow {
    fn from(config: &SelectorConfig) -> Self {
        Self {
            guild_id: config.guild_id().to_db(),
            roles: config.roles().clone(),
            inline: *config.inline(),
            channel_id: config.channel_id().map(ChannelId::to_db),
            message_id: config.message_id().map(MessageId::to_db),
        }
    }
}

/// Partial update of `selector_configs`.
///
/// `None` fields are left out of the `SET` clause; `Some(None)` writes NULL.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = selector_configs)]
pub struct SelectorConfigChangeset {
    pub roles: Option<Vec<i32>>,
    pub inline: Option<bool>,
    pub channel_id: Option<Option<i64>>,
    pub message_id: Option<Option<i64>>,
}

impl From<&ConfigChanges> for SelectorConfigChangeset {
    fn from(changes: &ConfigChanges) -> Self {
        Self {
            roles: changes.roles.clone(),
            inline: changes.inline,
            channel_id: changes.channel_id.map(|c| c.map(ChannelId::to_db)),
            message_id: changes.message_id.map(|m| m.map(MessageId::to_db)),
        }
    }
}
