//! Tests for rendering and publishing the selector.

mod test_utils;

use rolecall_core::{ChannelId, EntryRepository, MessageId};
use rolecall_error::SelectorErrorKind;
use rolecall_selector::SelectorPublisher;
use test_utils::{BLUE, CHANNEL, GatewayCall, GUILD, Harness};

#[tokio::test]
async fn test_publish_attaches_reactions_in_list_order() {
    let harness = Harness::new().with_blue_and_red().await;
    harness.commands.move_down(GUILD, BLUE).await.unwrap();

    let report = harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(*report.expected(), 2);
    assert_eq!(harness.gateway.attached_reactions(), vec!["🔴", "🔵"]);

    let live = harness.registry.snapshot(GUILD).await.unwrap();
    assert!(live.is_published_at(CHANNEL, *report.message_id()));
}

#[tokio::test]
async fn test_render_uses_guild_name_and_entry_labels() {
    let harness = Harness::new().with_blue_and_red().await;
    harness.commands.inline(GUILD).await.unwrap();
    harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();

    let selector = harness
        .gateway
        .calls()
        .into_iter()
        .find_map(|call| match call {
            GatewayCall::SendSelector { selector, .. } => Some(selector),
            _ => None,
        })
        .unwrap();

    assert_eq!(selector.title, "Test Guild Roles");
    assert_eq!(
        selector.description,
        "Click the reactions to give or remove roles."
    );
    assert!(!selector.inline);
    assert_eq!(selector.fields[0].heading, "🔵 Blue");
    assert_eq!(selector.fields[0].body, "The blue team");
    assert_eq!(selector.fields[1].heading, "🔴 Red");
}

#[tokio::test]
async fn test_respawn_replaces_previous_message() {
    let harness = Harness::new().with_blue_and_red().await;
    let first = harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    harness.gateway.clear_calls();

    let other = ChannelId(2001);
    let second = harness
        .commands
        .spawn(GUILD, other, Some(MessageId(42)))
        .await
        .unwrap();

    let calls = harness.gateway.calls();
    assert!(calls.contains(&GatewayCall::DeleteMessage {
        channel_id: other,
        message_id: MessageId(42),
    }));
    assert!(calls.contains(&GatewayCall::DeleteMessage {
        channel_id: CHANNEL,
        message_id: *first.message_id(),
    }));

    let stored = harness.configs_repo.stored(GUILD).await.unwrap();
    assert_eq!(*stored.channel_id(), Some(other));
    assert_eq!(*stored.message_id(), Some(*second.message_id()));
}

#[tokio::test]
async fn test_failed_commit_keeps_previous_selector_live() {
    let harness = Harness::new().with_blue_and_red().await;
    let first = harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    harness.gateway.clear_calls();
    harness.configs_repo.fail_writes(true);

    let err = harness
        .commands
        .spawn(GUILD, CHANNEL, Some(MessageId(42)))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Sorry, something went wrong.");

    let calls = harness.gateway.calls();
    let deleted: Vec<_> = calls
        .iter()
        .filter_map(|call| match call {
            GatewayCall::DeleteMessage { message_id, .. } => Some(*message_id),
            _ => None,
        })
        .collect();
    // Only the uncommitted message goes away.
    assert_eq!(deleted.len(), 1);
    assert_ne!(deleted[0], *first.message_id());
    assert_ne!(deleted[0], MessageId(42));

    let live = harness.registry.snapshot(GUILD).await.unwrap();
    assert!(live.is_published_at(CHANNEL, *first.message_id()));
}

#[tokio::test]
async fn test_previous_selector_deleted_after_new_one_is_sent() {
    let harness = Harness::new().with_blue_and_red().await;
    let first = harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    harness.gateway.clear_calls();

    harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    let calls = harness.gateway.calls();
    let sent = calls
        .iter()
        .position(|call| matches!(call, GatewayCall::SendSelector { .. }))
        .unwrap();
    let retired = calls
        .iter()
        .position(|call| {
            *call
                == GatewayCall::DeleteMessage {
                    channel_id: CHANNEL,
                    message_id: *first.message_id(),
                }
        })
        .unwrap();
    assert!(sent < retired);
}

#[tokio::test]
async fn test_failed_delete_does_not_block_publish() {
    let harness = Harness::new().with_blue_and_red().await;
    harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    harness.gateway.fail_deletes(true);

    let report = harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_reaction_failure_stops_attachment() {
    let harness = Harness::new().with_blue_and_red().await;
    harness.gateway.fail_reactions_after(1);

    let report = harness.commands.spawn(GUILD, CHANNEL, None).await.unwrap();
    assert_eq!(*report.attached(), 1);
    assert!(!report.is_complete());
    assert_eq!(harness.gateway.attached_reactions(), vec!["🔵"]);

    // The message is still recorded so reactions on it are handled.
    let live = harness.registry.snapshot(GUILD).await.unwrap();
    assert!(live.is_published_at(CHANNEL, *report.message_id()));
}

#[tokio::test]
async fn test_resolve_never_skips_missing_entries() {
    let harness = Harness::new().with_blue_and_red().await;
    let live = harness.registry.snapshot(GUILD).await.unwrap();
    let missing = live.roles()[1];
    harness.entries_repo.forget(missing).await;
    assert_eq!(harness.entries_repo.count().await.unwrap(), 1);

    let publisher = SelectorPublisher::new(harness.entries.clone(), harness.gateway.clone());
    let err = publisher.resolve(&live).await.unwrap_err();
    assert_eq!(err.kind, SelectorErrorKind::ConsistencyFault(missing));
}
