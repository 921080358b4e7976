//! Test utilities for selector tests.
//!
//! Builds a complete selector stack over the in-memory repositories and a
//! recording gateway.

#![allow(dead_code)]

pub mod mock_gateway;

pub use mock_gateway::{GatewayCall, RecordingGateway};

use rolecall_core::{
    ChannelId, GuildId, GuildRole, InMemoryConfigRepository, InMemoryEntryRepository,
    MemberSnapshot, RoleId, UserId,
};
use rolecall_selector::{
    ConfigRegistry, EntryStore, ReactionReconciler, SelectorCommands, SelectorSettings,
};
use std::sync::Arc;
use std::time::Duration;

pub const GUILD: GuildId = GuildId(1000);
pub const CHANNEL: ChannelId = ChannelId(2000);
pub const MEMBER: UserId = UserId(3000);
pub const BOT: UserId = UserId(3001);
pub const BLUE: RoleId = RoleId(100);
pub const RED: RoleId = RoleId(200);
pub const GREEN: RoleId = RoleId(300);
pub const MODERATOR: RoleId = RoleId(999);

/// Everything a test needs, wired together.
pub struct Harness {
    pub entries_repo: InMemoryEntryRepository,
    pub configs_repo: InMemoryConfigRepository,
    pub gateway: Arc<RecordingGateway>,
    pub registry: Arc<ConfigRegistry>,
    pub entries: EntryStore,
    pub commands: SelectorCommands,
    pub reconciler: Arc<ReactionReconciler>,
}

impl Harness {
    pub fn new() -> Self {
        let entries_repo = InMemoryEntryRepository::new();
        let configs_repo = InMemoryConfigRepository::new();
        let gateway = Arc::new(RecordingGateway::new("Test Guild"));
        gateway.set_guild_roles(vec![
            guild_role(GUILD.get(), "@everyone", 0),
            guild_role(BLUE.get(), "Blue", 1),
            guild_role(RED.get(), "Red", 2),
            guild_role(GREEN.get(), "Green", 3),
            guild_role(MODERATOR.get(), "Moderator", 10),
        ]);
        gateway.set_member(member(MEMBER, false));
        gateway.set_member(member(BOT, true));

        let registry = Arc::new(ConfigRegistry::new(
            Arc::new(configs_repo.clone()),
            Arc::new(entries_repo.clone()),
        ));
        let entries = EntryStore::new(Arc::new(entries_repo.clone()));
        let settings = SelectorSettings::default()
            .with_moderator_role_id(Some(MODERATOR))
            .with_notice_ttl(Duration::from_secs(10));
        let commands = SelectorCommands::new(
            registry.clone(),
            entries.clone(),
            gateway.clone(),
            settings.clone(),
        );
        let reconciler = Arc::new(ReactionReconciler::new(
            registry.clone(),
            entries.clone(),
            gateway.clone(),
            *settings.notice_ttl(),
        ));

        Self {
            entries_repo,
            configs_repo,
            gateway,
            registry,
            entries,
            commands,
            reconciler,
        }
    }

    /// Register blue (🔵) then red (🔴) in the test guild.
    pub async fn with_blue_and_red(self) -> Self {
        self.commands
            .add(GUILD, BLUE, "🔵", "Blue", "The blue team")
            .await
            .expect("add blue");
        self.commands
            .add(GUILD, RED, "🔴", "Red", "The red team")
            .await
            .expect("add red");
        self
    }
}

pub fn guild_role(id: u64, name: &str, position: u16) -> GuildRole {
    GuildRole {
        id: RoleId(id),
        name: name.to_string(),
        position,
    }
}

pub fn member(user_id: UserId, bot: bool) -> MemberSnapshot {
    MemberSnapshot {
        user_id,
        display_name: format!("user-{user_id}"),
        avatar_url: None,
        bot,
        roles: Vec::new(),
    }
}
