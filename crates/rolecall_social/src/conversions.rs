//! Conversions between serenity and Rolecall types.

use rolecall_core::{ChannelId, GuildId, GuildRole, MemberSnapshot, MessageId, RoleId, UserId};
use rolecall_error::{GatewayError, GatewayErrorKind};
use serenity::all::{Member, Role};

/// Map a serenity failure to a gateway error.
///
/// HTTP 403 becomes `PermissionDenied`, 404 becomes `NotFound`, and everything
/// else is `Transport`.
#[track_caller]
pub fn gateway_error(action: &str, err: serenity::Error) -> GatewayError {
    let status = match &err {
        serenity::Error::Http(http_err) => http_err.status_code().map(|s| s.as_u16()),
        _ => None,
    };
    GatewayError::new(kind_for_status(status, format!("{action}: {err}")))
}

pub(crate) fn kind_for_status(status: Option<u16>, message: String) -> GatewayErrorKind {
    match status {
        Some(403) => GatewayErrorKind::PermissionDenied(message),
        Some(404) => GatewayErrorKind::NotFound(message),
        _ => GatewayErrorKind::Transport(message),
    }
}

pub(crate) fn to_serenity_guild(id: GuildId) -> serenity::all::GuildId {
    serenity::all::GuildId::new(id.get())
}

pub(crate) fn to_serenity_channel(id: ChannelId) -> serenity::all::ChannelId {
    serenity::all::ChannelId::new(id.get())
}

pub(crate) fn to_serenity_message(id: MessageId) -> serenity::all::MessageId {
    serenity::all::MessageId::new(id.get())
}

pub(crate) fn to_serenity_user(id: UserId) -> serenity::all::UserId {
    serenity::all::UserId::new(id.get())
}

pub(crate) fn to_serenity_role(id: RoleId) -> serenity::all::RoleId {
    serenity::all::RoleId::new(id.get())
}

pub(crate) fn member_snapshot(member: &Member) -> MemberSnapshot {
    MemberSnapshot {
        user_id: UserId(member.user.id.get()),
        display_name: member.display_name().to_string(),
        avatar_url: member.user.avatar_url(),
        bot: member.user.bot,
        roles: member.roles.iter().map(|r| RoleId(r.get())).collect(),
    }
}

pub(crate) fn guild_role(role: &Role) -> GuildRole {
    GuildRole {
        id: RoleId(role.id.get()),
        name: role.name.clone(),
        position: role.position,
    }
}
