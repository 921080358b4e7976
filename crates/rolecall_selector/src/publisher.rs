//! Rendering and publishing the selector message.

use crate::EntryStore;
use derive_getters::Getters;
use rolecall_core::{
    ChannelId, Gateway, MessageId, RenderedSelector, RoleEntry, SelectorConfig, SelectorField,
};
use rolecall_error::{SelectorError, SelectorErrorKind, SelectorResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const SELECTOR_DESCRIPTION: &str = "Click the reactions to give or remove roles.";

/// What a publish actually achieved.
///
/// Reaction attachment stops at the first failure, so `attached` may be smaller
/// than `expected`; the selector message itself was still posted and recorded.
/// `replaced` is the message this publish supersedes, if any.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PublishReport {
    channel_id: ChannelId,
    message_id: MessageId,
    attached: usize,
    expected: usize,
    replaced: Option<(ChannelId, MessageId)>,
}

impl PublishReport {
    /// Whether every trigger reaction was attached.
    pub fn is_complete(&self) -> bool {
        self.attached == self.expected
    }
}

/// Renders a guild's selector and replaces the published message.
#[derive(Clone)]
pub struct SelectorPublisher {
    entries: EntryStore,
    gateway: Arc<dyn Gateway>,
}

impl SelectorPublisher {
    /// Create a publisher.
    pub fn new(entries: EntryStore, gateway: Arc<dyn Gateway>) -> Self {
        Self { entries, gateway }
    }

    /// Resolve the config's entries in list order.
    ///
    /// # Errors
    ///
    /// `ConsistencyFault` with the first id that has no entry. Missing entries are
    /// never skipped.
    pub async fn resolve(&self, config: &SelectorConfig) -> SelectorResult<Vec<RoleEntry>> {
        let mut by_id: HashMap<_, _> = self
            .entries
            .list_by_ids(config.roles())
            .await?
            .into_iter()
            .map(|entry| (entry.id, entry))
            .collect();

        config
            .roles()
            .iter()
            .map(|id| {
                by_id
                    .remove(id)
                    .ok_or_else(|| SelectorError::new(SelectorErrorKind::ConsistencyFault(*id)))
            })
            .collect()
    }

    /// Build the selector message for `config`.
    #[instrument(skip(self, config), fields(guild_id = %config.guild_id()))]
    pub async fn render(&self, config: &SelectorConfig) -> SelectorResult<RenderedSelector> {
        let entries = self.resolve(config).await?;
        let guild_name = self.gateway.guild_name(*config.guild_id()).await?;

        let fields = entries
            .into_iter()
            .map(|entry| SelectorField {
                heading: format!("{} {}", entry.emoji, entry.name),
                body: entry.description,
                emoji: entry.emoji,
            })
            .collect();

        Ok(RenderedSelector {
            title: format!("{guild_name} Roles"),
            description: SELECTOR_DESCRIPTION.to_string(),
            inline: *config.inline(),
            fields,
        })
    }

    /// Post a fresh selector in `channel_id` and record it on `draft`.
    ///
    /// Reactions are attached in list order and attachment stops at the first
    /// failure. The previous message is left in place: once the new location is
    /// committed call [`Self::retire`], otherwise [`Self::discard`].
    ///
    /// # Errors
    ///
    /// `EmptySelector` when no roles are configured, `ConsistencyFault` when an
    /// entry is missing, or the gateway error if the message cannot be sent.
    #[instrument(skip(self, draft), fields(guild_id = %draft.guild_id()))]
    pub async fn publish(
        &self,
        draft: &mut SelectorConfig,
        channel_id: ChannelId,
    ) -> SelectorResult<PublishReport> {
        if draft.roles().is_empty() {
            return Err(SelectorError::new(SelectorErrorKind::EmptySelector));
        }

        let selector = self.render(draft).await?;
        let replaced = (*draft.channel_id()).zip(*draft.message_id());
        let message_id = self.gateway.send_selector(channel_id, &selector).await?;

        let expected = selector.fields.len();
        let mut attached = 0;
        for emoji in selector.emojis() {
            if let Err(e) = self.gateway.add_reaction(channel_id, message_id, emoji).await {
                warn!(%message_id, emoji, error = %e, "Stopped attaching selector reactions");
                break;
            }
            attached += 1;
        }

        draft.set_published(channel_id, message_id);
        info!(%channel_id, %message_id, attached, expected, "Published selector");

        Ok(PublishReport {
            channel_id,
            message_id,
            attached,
            expected,
            replaced,
        })
    }

    /// Delete the message a committed publish superseded, best effort.
    pub async fn retire(&self, report: &PublishReport) {
        let Some((channel_id, message_id)) = report.replaced else {
            return;
        };
        if (channel_id, message_id) == (report.channel_id, report.message_id) {
            return;
        }
        match self.gateway.delete_message(channel_id, message_id).await {
            Ok(()) => debug!(%message_id, "Deleted previous selector"),
            Err(e) => warn!(%message_id, error = %e, "Could not delete previous selector"),
        }
    }

    /// Delete the message of a publish whose location was never committed.
    pub async fn discard(&self, report: &PublishReport) {
        let message_id = report.message_id;
        if let Err(e) = self.gateway.delete_message(report.channel_id, message_id).await {
            warn!(%message_id, error = %e, "Could not delete uncommitted selector");
        }
    }
}
