//! Serenity implementation of the platform gateway.

use crate::conversions::{
    gateway_error, guild_role, member_snapshot, to_serenity_channel, to_serenity_guild,
    to_serenity_message, to_serenity_role, to_serenity_user,
};
use async_trait::async_trait;
use rolecall_core::{
    ChannelId, Gateway, GuildId, GuildRole, MemberSnapshot, MessageId, Notice, RenderedSelector,
    RoleId, UserId,
};
use rolecall_error::GatewayResult;
use serenity::all::{CreateEmbed, CreateEmbedAuthor, CreateMessage, ReactionType};
use serenity::http::Http;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Gateway backed by the Discord REST API.
///
/// Every method is one HTTP call. Notices are deleted by a detached task once
/// their time to live has passed.
#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    /// Wrap a serenity HTTP client.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn selector_embed(selector: &RenderedSelector) -> CreateEmbed {
        selector.fields.iter().fold(
            CreateEmbed::new()
                .author(CreateEmbedAuthor::new(&selector.title))
                .description(&selector.description),
            |embed, field| embed.field(&field.heading, &field.body, selector.inline),
        )
    }

    fn notice_message(notice: &Notice) -> CreateMessage {
        match notice {
            Notice::Text(text) => CreateMessage::new().content(text),
            Notice::RoleToggled {
                added,
                role_id,
                member_name,
                member_avatar,
            } => {
                let mut author = CreateEmbedAuthor::new(member_name);
                if let Some(avatar) = member_avatar {
                    author = author.icon_url(avatar);
                }
                let title = if *added { "Role Added" } else { "Role Removed" };
                CreateMessage::new().embed(
                    CreateEmbed::new()
                        .title(title)
                        .description(format!("<@&{role_id}>"))
                        .author(author),
                )
            }
        }
    }
}

fn reaction_type(emoji: &str) -> ReactionType {
    ReactionType::try_from(emoji).unwrap_or_else(|_| ReactionType::Unicode(emoji.to_string()))
}

#[async_trait]
impl Gateway for SerenityGateway {
    async fn guild_name(&self, guild_id: GuildId) -> GatewayResult<String> {
        let guild = self
            .http
            .get_guild(to_serenity_guild(guild_id))
            .await
            .map_err(|e| gateway_error("get guild", e))?;
        Ok(guild.name)
    }

    #[instrument(skip(self, selector), fields(fields = selector.fields.len()))]
    async fn send_selector(
        &self,
        channel_id: ChannelId,
        selector: &RenderedSelector,
    ) -> GatewayResult<MessageId> {
        let message = to_serenity_channel(channel_id)
            .send_message(
                &*self.http,
                CreateMessage::new().embed(Self::selector_embed(selector)),
            )
            .await
            .map_err(|e| gateway_error("send selector", e))?;
        Ok(MessageId(message.id.get()))
    }

    async fn send_notice(
        &self,
        channel_id: ChannelId,
        notice: &Notice,
        ttl: Duration,
    ) -> GatewayResult<()> {
        let channel = to_serenity_channel(channel_id);
        let message = channel
            .send_message(&*self.http, Self::notice_message(notice))
            .await
            .map_err(|e| gateway_error("send notice", e))?;

        let http = self.http.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = http.delete_message(channel, message.id, None).await {
                debug!(message_id = %message.id, error = %e, "Notice already gone");
            }
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> GatewayResult<()> {
        self.http
            .delete_message(
                to_serenity_channel(channel_id),
                to_serenity_message(message_id),
                None,
            )
            .await
            .map_err(|e| gateway_error("delete message", e))
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> GatewayResult<()> {
        self.http
            .create_reaction(
                to_serenity_channel(channel_id),
                to_serenity_message(message_id),
                &reaction_type(emoji),
            )
            .await
            .map_err(|e| gateway_error("add reaction", e))
    }

    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: &str,
    ) -> GatewayResult<()> {
        self.http
            .delete_reaction(
                to_serenity_channel(channel_id),
                to_serenity_message(message_id),
                to_serenity_user(user_id),
                &reaction_type(emoji),
            )
            .await
            .map_err(|e| gateway_error("remove reaction", e))
    }

    async fn member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> GatewayResult<Option<MemberSnapshot>> {
        match self
            .http
            .get_member(to_serenity_guild(guild_id), to_serenity_user(user_id))
            .await
        {
            Ok(member) => Ok(Some(member_snapshot(&member))),
            Err(e) => {
                let err = gateway_error("get member", e);
                if err.is_not_found() { Ok(None) } else { Err(err) }
            }
        }
    }

    async fn guild_roles(&self, guild_id: GuildId) -> GatewayResult<Vec<GuildRole>> {
        let roles = self
            .http
            .get_guild_roles(to_serenity_guild(guild_id))
            .await
            .map_err(|e| gateway_error("get guild roles", e))?;
        Ok(roles.iter().map(guild_role).collect())
    }

    #[instrument(skip(self))]
    async fn add_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> GatewayResult<()> {
        self.http
            .add_member_role(
                to_serenity_guild(guild_id),
                to_serenity_user(user_id),
                to_serenity_role(role_id),
                Some(reason),
            )
            .await
            .map_err(|e| gateway_error("add member role", e))
    }

    #[instrument(skip(self))]
    async fn remove_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> GatewayResult<()> {
        self.http
            .remove_member_role(
                to_serenity_guild(guild_id),
                to_serenity_user(user_id),
                to_serenity_role(role_id),
                Some(reason),
            )
            .await
            .map_err(|e| gateway_error("remove member role", e))
    }
}
