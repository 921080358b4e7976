//! Serenity event handler for the role selector.

use crate::command::{RolesCommand, USAGE, parse_command};
use derive_getters::Getters;
use rolecall_core::{ChannelId, GuildId, GuildRole, MessageId, ReactionEvent, RoleEntry, UserId};
use rolecall_error::SelectorResult;
use rolecall_selector::{ReactionDispatcher, SelectorCommands};
use serenity::all::{CreateEmbed, CreateMessage, GatewayIntents, Message, Reaction, Ready};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Discord caps embeds at 25 fields.
const FIELDS_PER_EMBED: usize = 24;

/// What a command wants sent back.
enum Reply {
    Text(String),
    Embeds(Vec<CreateEmbed>),
    Nothing,
}

/// Event handler wiring Discord events into the selector.
#[derive(Getters)]
pub struct RolecallHandler {
    commands: Arc<SelectorCommands>,
    dispatcher: Arc<ReactionDispatcher>,
    prefix: String,
}

impl RolecallHandler {
    /// Create a handler answering commands that start with `prefix`.
    pub fn new(
        commands: Arc<SelectorCommands>,
        dispatcher: Arc<ReactionDispatcher>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            commands,
            dispatcher,
            prefix: prefix.into(),
        }
    }

    /// Gateway intents the handler relies on.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Moderators hold the configured moderator role; the guild owner always may.
    async fn is_moderator(&self, ctx: &Context, guild_id: GuildId, msg: &Message) -> bool {
        if let (Some(moderator), Some(member)) =
            (self.commands.settings().moderator_role_id(), &msg.member)
            && member.roles.iter().any(|r| r.get() == moderator.get())
        {
            return true;
        }

        match ctx
            .http
            .get_guild(serenity::all::GuildId::new(guild_id.get()))
            .await
        {
            Ok(guild) => guild.owner_id == msg.author.id,
            Err(e) => {
                warn!(error = %e, "Could not fetch guild owner");
                false
            }
        }
    }

    async fn run(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        command: RolesCommand,
    ) -> SelectorResult<Reply> {
        let commands = &self.commands;
        let reply = match command {
            RolesCommand::Spawn => {
                commands
                    .spawn(guild_id, channel_id, Some(message_id))
                    .await?;
                Reply::Nothing
            }
            RolesCommand::Add {
                role_id,
                emoji,
                name,
                description,
            } => Reply::Text(
                commands
                    .add(guild_id, role_id, &emoji, &name, &description)
                    .await?,
            ),
            RolesCommand::Remove { role_id } => {
                Reply::Text(commands.remove(guild_id, role_id).await?)
            }
            RolesCommand::Edit {
                role_id,
                field,
                value,
            } => Reply::Text(commands.edit(guild_id, role_id, &field, &value).await?),
            RolesCommand::Inline => Reply::Text(commands.inline(guild_id).await?),
            RolesCommand::MoveUp { role_id } => {
                Reply::Text(commands.move_up(guild_id, role_id).await?)
            }
            RolesCommand::MoveDown { role_id } => {
                Reply::Text(commands.move_down(guild_id, role_id).await?)
            }
            RolesCommand::Print => Reply::Embeds(print_embeds(&commands.print(guild_id).await?)),
            RolesCommand::List => Reply::Embeds(list_embeds(&commands.list(guild_id).await?)),
            RolesCommand::Help => Reply::Text(format!("```\n{USAGE}\n```")),
        };
        Ok(reply)
    }
}

fn print_embeds(entries: &[RoleEntry]) -> Vec<CreateEmbed> {
    entries
        .chunks(FIELDS_PER_EMBED)
        .map(|page| {
            page.iter().fold(CreateEmbed::new(), |embed, entry| {
                embed.field(
                    &entry.name,
                    format!("ROLE ID: {}\nEMOJI: {}", entry.role_id, entry.emoji),
                    true,
                )
            })
        })
        .collect()
}

fn list_embeds(roles: &[GuildRole]) -> Vec<CreateEmbed> {
    roles
        .chunks(FIELDS_PER_EMBED)
        .map(|page| {
            page.iter().fold(CreateEmbed::new(), |embed, role| {
                embed.field(&role.name, format!("ID: {}", role.id), true)
            })
        })
        .collect()
}

#[async_trait]
impl EventHandler for RolecallHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Rolecall connected to Discord"
        );
    }

    async fn reaction_add(&self, _ctx: Context, reaction: Reaction) {
        let (Some(guild_id), Some(user_id)) = (reaction.guild_id, reaction.user_id) else {
            return;
        };

        let event = ReactionEvent {
            guild_id: GuildId(guild_id.get()),
            channel_id: ChannelId(reaction.channel_id.get()),
            message_id: MessageId(reaction.message_id.get()),
            emoji: reaction.emoji.to_string(),
            user_id: UserId(user_id.get()),
        };
        self.dispatcher.dispatch(event).await;
    }

    #[instrument(skip(self, ctx, msg), fields(guild_id, author = %msg.author.id))]
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };
        let Some(parsed) = parse_command(&self.prefix, &msg.content) else {
            return;
        };
        let guild_id = GuildId(guild_id.get());
        tracing::Span::current().record("guild_id", guild_id.get());

        if !self.is_moderator(&ctx, guild_id, &msg).await {
            debug!("Ignoring roles command from non-moderator");
            return;
        }

        let result = match parsed {
            Ok(command) => {
                debug!(?command, "Running roles command");
                self.run(
                    guild_id,
                    ChannelId(msg.channel_id.get()),
                    MessageId(msg.id.get()),
                    command,
                )
                .await
            }
            Err(e) => Err(e),
        };

        let outgoing = match result {
            Ok(Reply::Nothing) => return,
            Ok(Reply::Text(text)) => vec![CreateMessage::new().content(text)],
            Ok(Reply::Embeds(embeds)) => embeds
                .into_iter()
                .map(|embed| CreateMessage::new().embed(embed))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Roles command failed");
                vec![CreateMessage::new().content(e.user_message())]
            }
        };

        for message in outgoing {
            if let Err(e) = msg.channel_id.send_message(&ctx, message).await {
                warn!(error = %e, "Could not send command reply");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolecall_core::RoleId;

    fn entry(id: i32) -> RoleEntry {
        RoleEntry {
            id,
            role_id: RoleId(id as u64 + 100),
            emoji: "🔵".to_string(),
            name: format!("Role {id}"),
            description: "A role".to_string(),
        }
    }

    #[test]
    fn test_print_pages_respect_field_limit() {
        let entries: Vec<_> = (1..=30).map(entry).collect();
        assert_eq!(print_embeds(&entries).len(), 2);
        assert_eq!(print_embeds(&entries[..24]).len(), 1);
    }

    #[test]
    fn test_intents_include_reactions() {
        assert!(RolecallHandler::intents().contains(GatewayIntents::GUILD_MESSAGE_REACTIONS));
        assert!(RolecallHandler::intents().contains(GatewayIntents::MESSAGE_CONTENT));
    }
}
