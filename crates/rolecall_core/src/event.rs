//! Inbound reaction events.

use crate::{ChannelId, GuildId, MessageId, UserId};
use serde::{Deserialize, Serialize};

/// A raw reaction-add as delivered by the platform.
///
/// Delivery is at-least-once and unordered across guilds; the reconciler treats
/// every event independently and re-checks live state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Guild the reaction happened in
    pub guild_id: GuildId,
    /// Channel of the reacted message
    pub channel_id: ChannelId,
    /// Reacted message
    pub message_id: MessageId,
    /// Reaction token (the unicode emoji, or the platform's custom-emoji format)
    pub emoji: String,
    /// Member who reacted
    pub user_id: UserId,
}
