//! Turning reaction events into role grants and revocations.

use crate::{ConfigRegistry, EntryStore};
use rolecall_core::{
    Gateway, GuildId, MemberSnapshot, Notice, ReactionEvent, RoleId, SelectorConfig,
};
use rolecall_error::{GatewayError, SelectorResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Audit log reason when a role is granted.
pub const ADDED_REASON: &str = "Added through Role Selector";

/// Audit log reason when a role is revoked.
pub const REMOVED_REASON: &str = "Removed through Role Selector";

/// Why an event was discarded without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum IgnoreReason {
    /// The guild has no selector config
    NoSelector,
    /// The reaction is not on the published selector message
    NotSelectorMessage,
    /// The reacting user is not a guild member
    UnknownMember,
    /// The reacting user is a bot
    BotActor,
}

/// Result of handling one reaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionOutcome {
    /// Discarded before any side effect
    Ignored(IgnoreReason),
    /// The reaction matches no entry in the guild's list
    NoMatchingEntry,
    /// The role was granted
    Added(RoleId),
    /// The role was revoked
    Removed(RoleId),
    /// The entry points at a role the guild no longer has
    DanglingRole(RoleId),
    /// The platform refused the role change
    PermissionDenied(RoleId),
    /// The role change failed for another reason
    Failed(RoleId),
}

/// Handles reactions on a guild's published selector.
///
/// Every matched reaction is retracted so the selector always shows only the
/// bot's own reactions. Membership is read live for each event, which keeps
/// toggles correct even when roles change outside the selector.
pub struct ReactionReconciler {
    registry: Arc<ConfigRegistry>,
    entries: EntryStore,
    gateway: Arc<dyn Gateway>,
    notice_ttl: Duration,
}

impl ReactionReconciler {
    /// Create a reconciler posting notices that expire after `notice_ttl`.
    pub fn new(
        registry: Arc<ConfigRegistry>,
        entries: EntryStore,
        gateway: Arc<dyn Gateway>,
        notice_ttl: Duration,
    ) -> Self {
        Self {
            registry,
            entries,
            gateway,
            notice_ttl,
        }
    }

    /// Whether the guild has a published selector.
    pub async fn watches(&self, guild_id: GuildId) -> bool {
        self.registry
            .snapshot(guild_id)
            .await
            .is_some_and(|config| config.message_id().is_some())
    }

    /// Handle one reaction-add event.
    ///
    /// Platform failures during the toggle become outcomes and notices, not
    /// errors. Errors are returned when the member or entry lookup fails.
    #[instrument(
        skip(self, event),
        fields(guild_id = %event.guild_id, user_id = %event.user_id, emoji = %event.emoji)
    )]
    pub async fn handle(&self, event: &ReactionEvent) -> SelectorResult<ReactionOutcome> {
        let Some(config) = self.registry.snapshot(event.guild_id).await else {
            return Ok(ReactionOutcome::Ignored(IgnoreReason::NoSelector));
        };

        if !config.is_published_at(event.channel_id, event.message_id) {
            return Ok(ReactionOutcome::Ignored(IgnoreReason::NotSelectorMessage));
        }

        let member = match self.gateway.member(event.guild_id, event.user_id).await {
            Ok(Some(member)) => member,
            Ok(None) => return Ok(ReactionOutcome::Ignored(IgnoreReason::UnknownMember)),
            Err(e) if e.is_not_found() => {
                return Ok(ReactionOutcome::Ignored(IgnoreReason::UnknownMember));
            }
            Err(e) => return Err(e.into()),
        };

        if member.bot {
            return Ok(ReactionOutcome::Ignored(IgnoreReason::BotActor));
        }

        self.retract(event).await;

        let outcome = self.toggle(event, &config, &member).await?;
        debug!(?outcome, "Reaction handled");
        Ok(outcome)
    }

    async fn toggle(
        &self,
        event: &ReactionEvent,
        config: &SelectorConfig,
        member: &MemberSnapshot,
    ) -> SelectorResult<ReactionOutcome> {
        let Some(entry) = self
            .entries
            .find_by_trigger(&event.emoji, config.roles())
            .await?
        else {
            return Ok(ReactionOutcome::NoMatchingEntry);
        };
        let role_id = entry.role_id;

        let exists = match self.gateway.guild_roles(event.guild_id).await {
            Ok(roles) => roles.iter().any(|role| role.id == role_id),
            Err(e) => return Ok(self.report_failure(event, role_id, e).await),
        };
        if !exists {
            warn!(%role_id, entry_id = entry.id, "Selector entry points at a deleted role");
            self.notify(
                event,
                Notice::text(format!(
                    "Role with ID `{role_id}` registered but not found. Has it been deleted?"
                )),
            )
            .await;
            return Ok(ReactionOutcome::DanglingRole(role_id));
        }

        let added = !member.has_role(role_id);
        let result = if added {
            self.gateway
                .add_member_role(event.guild_id, member.user_id, role_id, ADDED_REASON)
                .await
        } else {
            self.gateway
                .remove_member_role(event.guild_id, member.user_id, role_id, REMOVED_REASON)
                .await
        };

        if let Err(e) = result {
            return Ok(self.report_failure(event, role_id, e).await);
        }

        info!(%role_id, added, "Toggled role");
        self.notify(
            event,
            Notice::RoleToggled {
                added,
                role_id,
                member_name: member.display_name.clone(),
                member_avatar: member.avatar_url.clone(),
            },
        )
        .await;

        Ok(if added {
            ReactionOutcome::Added(role_id)
        } else {
            ReactionOutcome::Removed(role_id)
        })
    }

    async fn report_failure(
        &self,
        event: &ReactionEvent,
        role_id: RoleId,
        error: GatewayError,
    ) -> ReactionOutcome {
        if error.is_permission_denied() {
            warn!(%role_id, error = %error, "Not allowed to manage role");
            self.notify(event, Notice::text("Sorry, I'm not allowed to manage roles."))
                .await;
            ReactionOutcome::PermissionDenied(role_id)
        } else {
            warn!(%role_id, error = %error, "Role toggle failed");
            self.notify(event, Notice::text("Sorry, something went wrong."))
                .await;
            ReactionOutcome::Failed(role_id)
        }
    }

    async fn retract(&self, event: &ReactionEvent) {
        if let Err(e) = self
            .gateway
            .remove_reaction(
                event.channel_id,
                event.message_id,
                event.user_id,
                &event.emoji,
            )
            .await
        {
            warn!(error = %e, "Could not retract reaction");
        }
    }

    async fn notify(&self, event: &ReactionEvent, notice: Notice) {
        if let Err(e) = self
            .gateway
            .send_notice(event.channel_id, &notice, self.notice_ttl)
            .await
        {
            warn!(error = %e, "Could not send notice");
        }
    }
}
