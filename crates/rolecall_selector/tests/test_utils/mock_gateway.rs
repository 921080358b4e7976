//! Recording gateway mock.

use async_trait::async_trait;
use rolecall_core::{
    ChannelId, Gateway, GuildId, GuildRole, MemberSnapshot, MessageId, Notice, RenderedSelector,
    RoleId, UserId,
};
use rolecall_error::{GatewayError, GatewayErrorKind, GatewayResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A platform call the mock observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    SendSelector {
        channel_id: ChannelId,
        selector: RenderedSelector,
    },
    SendNotice {
        channel_id: ChannelId,
        notice: Notice,
    },
    DeleteMessage {
        channel_id: ChannelId,
        message_id: MessageId,
    },
    AddReaction {
        message_id: MessageId,
        emoji: String,
    },
    RemoveReaction {
        message_id: MessageId,
        user_id: UserId,
        emoji: String,
    },
    AddMemberRole {
        user_id: UserId,
        role_id: RoleId,
        reason: String,
    },
    RemoveMemberRole {
        user_id: UserId,
        role_id: RoleId,
        reason: String,
    },
}

#[derive(Default)]
struct State {
    guild_name: String,
    members: HashMap<UserId, MemberSnapshot>,
    roles: Vec<GuildRole>,
    calls: Vec<GatewayCall>,
    next_message: u64,
    role_change_failure: Option<GatewayErrorKind>,
    reactions_before_failure: Option<usize>,
    fail_deletes: bool,
}

/// Gateway that records every call and keeps member roles in memory.
pub struct RecordingGateway {
    state: Mutex<State>,
}

impl RecordingGateway {
    pub fn new(guild_name: &str) -> Self {
        Self {
            state: Mutex::new(State {
                guild_name: guild_name.to_string(),
                next_message: 5000,
                ..State::default()
            }),
        }
    }

    pub fn set_member(&self, member: MemberSnapshot) {
        let mut state = self.state.lock().unwrap();
        state.members.insert(member.user_id, member);
    }

    pub fn set_guild_roles(&self, roles: Vec<GuildRole>) {
        self.state.lock().unwrap().roles = roles;
    }

    pub fn delete_guild_role(&self, role_id: RoleId) {
        self.state.lock().unwrap().roles.retain(|r| r.id != role_id);
    }

    /// Make every member role change fail with `kind`.
    pub fn fail_role_changes(&self, kind: Option<GatewayErrorKind>) {
        self.state.lock().unwrap().role_change_failure = kind;
    }

    /// Let `count` reactions succeed, then fail the rest.
    pub fn fail_reactions_after(&self, count: usize) {
        self.state.lock().unwrap().reactions_before_failure = Some(count);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    pub fn member_roles(&self, user_id: UserId) -> Vec<RoleId> {
        self.state
            .lock()
            .unwrap()
            .members
            .get(&user_id)
            .map(|m| m.roles.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Emojis attached as reactions, in order.
    pub fn attached_reactions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::AddReaction { emoji, .. } => Some(emoji),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::SendNotice { notice, .. } => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn retracted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::RemoveReaction { emoji, .. } => Some(emoji),
                _ => None,
            })
            .collect()
    }

    pub fn role_changes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    GatewayCall::AddMemberRole { .. } | GatewayCall::RemoveMemberRole { .. }
                )
            })
            .count()
    }

    fn record(&self, call: GatewayCall) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn change_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
        add: bool,
    ) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        let call = if add {
            GatewayCall::AddMemberRole {
                user_id,
                role_id,
                reason: reason.to_string(),
            }
        } else {
            GatewayCall::RemoveMemberRole {
                user_id,
                role_id,
                reason: reason.to_string(),
            }
        };
        state.calls.push(call);

        if let Some(kind) = state.role_change_failure.clone() {
            return Err(GatewayError::new(kind));
        }

        let member = state
            .members
            .get_mut(&user_id)
            .ok_or_else(|| GatewayError::new(GatewayErrorKind::NotFound("member".into())))?;
        if add {
            member.roles.push(role_id);
        } else {
            member.roles.retain(|r| *r != role_id);
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn guild_name(&self, _guild_id: GuildId) -> GatewayResult<String> {
        Ok(self.state.lock().unwrap().guild_name.clone())
    }

    async fn send_selector(
        &self,
        channel_id: ChannelId,
        selector: &RenderedSelector,
    ) -> GatewayResult<MessageId> {
        let mut state = self.state.lock().unwrap();
        state.next_message += 1;
        state.calls.push(GatewayCall::SendSelector {
            channel_id,
            selector: selector.clone(),
        });
        Ok(MessageId(state.next_message))
    }

    async fn send_notice(
        &self,
        channel_id: ChannelId,
        notice: &Notice,
        _ttl: Duration,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::SendNotice {
            channel_id,
            notice: notice.clone(),
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::DeleteMessage {
            channel_id,
            message_id,
        });
        if self.state.lock().unwrap().fail_deletes {
            return Err(GatewayError::new(GatewayErrorKind::NotFound(
                "message".into(),
            )));
        }
        Ok(())
    }

    async fn add_reaction(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(remaining) = state.reactions_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(GatewayError::new(GatewayErrorKind::Transport(
                    "reaction limit".into(),
                )));
            }
            *remaining -= 1;
        }
        state.calls.push(GatewayCall::AddReaction {
            message_id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn remove_reaction(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: &str,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::RemoveReaction {
            message_id,
            user_id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> GatewayResult<Option<MemberSnapshot>> {
        Ok(self.state.lock().unwrap().members.get(&user_id).cloned())
    }

    async fn guild_roles(&self, _guild_id: GuildId) -> GatewayResult<Vec<GuildRole>> {
        Ok(self.state.lock().unwrap().roles.clone())
    }

    async fn add_member_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> GatewayResult<()> {
        self.change_role(user_id, role_id, reason, true)
    }

    async fn remove_member_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> GatewayResult<()> {
        self.change_role(user_id, role_id, reason, false)
    }
}
