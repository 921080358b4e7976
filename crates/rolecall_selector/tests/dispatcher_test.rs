//! Tests for per-guild reaction workers.

mod test_utils;

use rolecall_core::{GuildId, MessageId, ReactionEvent};
use rolecall_selector::ReactionDispatcher;
use test_utils::{BLUE, CHANNEL, GUILD, Harness, MEMBER};

#[tokio::test]
async fn test_events_for_a_guild_run_in_order() {
    let harness = Harness::new().with_blue_and_red().await;
    let report = harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    harness.gateway.clear_calls();

    let dispatcher = ReactionDispatcher::new(harness.reconciler.clone(), 4);
    let event = ReactionEvent {
        guild_id: GUILD,
        channel_id: CHANNEL,
        message_id: *report.message_id(),
        emoji: "🔵".to_string(),
        user_id: MEMBER,
    };

    // Three toggles in a row end with the role granted.
    for _ in 0..3 {
        dispatcher.dispatch(event.clone()).await;
    }
    assert_eq!(dispatcher.active_workers().await, 1);

    dispatcher.shutdown().await;
    assert_eq!(dispatcher.active_workers().await, 0);
    assert_eq!(harness.gateway.member_roles(MEMBER), vec![BLUE]);
    assert_eq!(harness.gateway.role_changes(), 3);
}

#[tokio::test]
async fn test_dispatch_after_shutdown_restarts_worker() {
    let harness = Harness::new().with_blue_and_red().await;
    let report = harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();

    let dispatcher = ReactionDispatcher::new(harness.reconciler.clone(), 1);
    dispatcher.shutdown().await;

    dispatcher
        .dispatch(ReactionEvent {
            guild_id: GUILD,
            channel_id: CHANNEL,
            message_id: *report.message_id(),
            emoji: "🔵".to_string(),
            user_id: MEMBER,
        })
        .await;
    dispatcher.shutdown().await;
    assert_eq!(harness.gateway.member_roles(MEMBER), vec![BLUE]);
}

#[tokio::test]
async fn test_guild_without_selector_starts_no_worker() {
    let harness = Harness::new().with_blue_and_red().await;
    let dispatcher = ReactionDispatcher::new(harness.reconciler.clone(), 4);

    // Configured but never published.
    dispatcher
        .dispatch(ReactionEvent {
            guild_id: GUILD,
            channel_id: CHANNEL,
            message_id: MessageId(1),
            emoji: "🔵".to_string(),
            user_id: MEMBER,
        })
        .await;
    // Unknown to the bot entirely.
    dispatcher
        .dispatch(ReactionEvent {
            guild_id: GuildId(4242),
            channel_id: CHANNEL,
            message_id: MessageId(1),
            emoji: "🔵".to_string(),
            user_id: MEMBER,
        })
        .await;

    assert_eq!(dispatcher.active_workers().await, 0);
    assert!(harness.registry.snapshot(GuildId(4242)).await.is_none());
    assert_eq!(harness.gateway.role_changes(), 0);
}
