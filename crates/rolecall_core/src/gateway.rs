//! Chat platform collaborator.

use crate::{ChannelId, GuildId, MessageId, Notice, RenderedSelector, RoleId, UserId};
use async_trait::async_trait;
use rolecall_error::GatewayResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Live view of a guild member, fetched fresh for every toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    /// Member user id
    pub user_id: UserId,
    /// Nickname or user name
    pub display_name: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
    /// Whether the account is a bot
    pub bot: bool,
    /// Roles the member holds right now
    pub roles: Vec<RoleId>,
}

impl MemberSnapshot {
    /// Whether the member currently holds `role_id`.
    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.roles.contains(&role_id)
    }
}

/// A role defined on the guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRole {
    /// Role id
    pub id: RoleId,
    /// Role name
    pub name: String,
    /// Hierarchy position (higher is more senior)
    pub position: u16,
}

/// Platform calls the selector needs.
///
/// Every call is a single network round trip and may fail with
/// permission-denied, not-found, or transport errors. Implementations must not
/// retry; callers decide what a failure means.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Guild display name.
    async fn guild_name(&self, guild_id: GuildId) -> GatewayResult<String>;

    /// Post the selector and return the new message id.
    async fn send_selector(
        &self,
        channel_id: ChannelId,
        selector: &RenderedSelector,
    ) -> GatewayResult<MessageId>;

    /// Post a notice that disappears after `ttl`.
    async fn send_notice(
        &self,
        channel_id: ChannelId,
        notice: &Notice,
        ttl: Duration,
    ) -> GatewayResult<()>;

    /// Delete a message.
    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId)
    -> GatewayResult<()>;

    /// Add the bot's own reaction.
    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> GatewayResult<()>;

    /// Remove `user_id`'s reaction.
    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: &str,
    ) -> GatewayResult<()>;

    /// Fetch a member; `None` if they are not in the guild.
    async fn member(&self, guild_id: GuildId, user_id: UserId)
    -> GatewayResult<Option<MemberSnapshot>>;

    /// All roles defined on the guild.
    async fn guild_roles(&self, guild_id: GuildId) -> GatewayResult<Vec<GuildRole>>;

    /// Grant a role.
    async fn add_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> GatewayResult<()>;

    /// Revoke a role.
    async fn remove_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> GatewayResult<()>;
}
