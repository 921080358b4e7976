//! Platform-neutral message content produced by the selector.

use crate::RoleId;
use serde::{Deserialize, Serialize};

/// One selector line: heading, body, and the reaction that toggles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorField {
    /// `"{emoji} {name}"`
    pub heading: String,
    /// Entry description
    pub body: String,
    /// Trigger symbol attached as a reaction
    pub emoji: String,
}

/// The full selector message, fields in configured order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSelector {
    /// Embed author line
    pub title: String,
    /// Embed description
    pub description: String,
    /// Whether fields render side by side
    pub inline: bool,
    /// Fields in `roles` order
    pub fields: Vec<SelectorField>,
}

impl RenderedSelector {
    /// Trigger symbols in attachment order.
    pub fn emojis(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.emoji.as_str())
    }
}

/// A short-lived message posted in the selector channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// Plain operator-visible text
    Text(String),
    /// A role was granted or revoked
    RoleToggled {
        /// `true` when granted
        added: bool,
        /// The toggled role
        role_id: RoleId,
        /// Member display name
        member_name: String,
        /// Member avatar, if any
        member_avatar: Option<String>,
    },
}

impl Notice {
    /// Plain text notice.
    pub fn text(message: impl Into<String>) -> Self {
        Notice::Text(message.into())
    }
}
