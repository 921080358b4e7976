//! Live Discord gateway tests.
//!
//! Run with `cargo test -p rolecall_social -- --ignored` after setting
//! `DISCORD_TOKEN`, `TEST_GUILD_ID`, and `TEST_CHANNEL_ID`.

use rolecall_core::{ChannelId, Gateway, GuildId, Notice};
use rolecall_social::SerenityGateway;
use serenity::http::Http;
use std::sync::Arc;
use std::time::Duration;

fn env_id(name: &str) -> u64 {
    std::env::var(name)
        .unwrap_or_else(|_| panic!("{name} not set"))
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a snowflake"))
}

fn gateway() -> SerenityGateway {
    dotenvy::dotenv().ok();
    let token = std::env::var("DISCORD_TOKEN").expect("DISCORD_TOKEN not set");
    SerenityGateway::new(Arc::new(Http::new(&token)))
}

#[tokio::test]
#[ignore]
async fn test_guild_roles_include_everyone() {
    let gateway = gateway();
    let guild_id = GuildId(env_id("TEST_GUILD_ID"));

    let roles = gateway.guild_roles(guild_id).await.expect("fetch roles");
    assert!(roles.iter().any(|role| role.id.get() == guild_id.get()));
}

#[tokio::test]
#[ignore]
async fn test_notice_round_trip() {
    let gateway = gateway();
    let channel_id = ChannelId(env_id("TEST_CHANNEL_ID"));

    gateway
        .send_notice(
            channel_id,
            &Notice::text("rolecall gateway test"),
            Duration::from_secs(1),
        )
        .await
        .expect("send notice");
    tokio::time::sleep(Duration::from_secs(2)).await;
}
