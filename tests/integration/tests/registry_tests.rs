//! Wormhole registry integration tests
//!
//! Drives the registry end-to-end through the in-memory ports.
//!
//! Run with: cargo test -p integration-tests --test registry_tests

use integration_tests::TestHarness;
use wormhole_core::value_objects::{ChannelId, GuildId};
use wormhole_core::{EndpointRepository, LinkMode, WormholeError, TOKEN_LEN};
use wormhole_service::WormholeRegistry;

const GUILD_A: GuildId = GuildId::new(1);
const GUILD_B: GuildId = GuildId::new(2);
const GUILD_C: GuildId = GuildId::new(3);
const CHANNEL_A: ChannelId = ChannelId::new(100);
const CHANNEL_B: ChannelId = ChannelId::new(200);
const CHANNEL_C: ChannelId = ChannelId::new(300);

// ============================================================================
// Open / Close
// ============================================================================

#[tokio::test]
async fn open_issues_well_formed_token() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let endpoint = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();

    assert_eq!(endpoint.token.len(), TOKEN_LEN);
    assert!(endpoint.token.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(!endpoint.locked);
    assert_eq!(endpoint.linked_to, None);
    assert_eq!(endpoint.mode, LinkMode::Explicit);
}

#[tokio::test]
async fn open_twice_fails_and_preserves_existing_record() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let first = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();

    let err = registry
        .open(GUILD_A, "Guild A", ChannelId::new(101))
        .await
        .unwrap_err();
    assert!(matches!(err, WormholeError::AlreadyOpen(g) if g == GUILD_A));

    // The existing record is untouched
    let view = registry.token(GUILD_A).await.unwrap();
    assert_eq!(view.token, first.token);
    assert_eq!(view.channel_id, CHANNEL_A);
}

#[tokio::test]
async fn close_unknown_channel_fails_not_found() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let err = registry.close(CHANNEL_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::NotFound(c) if c == CHANNEL_A));
}

#[tokio::test]
async fn close_rejects_active_link_until_unlinked() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    let err = registry.close(CHANNEL_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::LinkActive));

    registry.unlink(GUILD_A, CHANNEL_A).await.unwrap();
    registry.close(CHANNEL_A).await.unwrap();
    assert_eq!(harness.repo.len(), 1); // only B's endpoint remains
}

// ============================================================================
// Link
// ============================================================================

#[tokio::test]
async fn link_establishes_symmetric_locked_link() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    let result = registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    // The returned target is its pre-link state
    assert_eq!(result.target.guild_id, GUILD_A);
    assert!(!result.target.locked);

    // Requester row: born locked, pointed at the target, fresh token
    assert_eq!(result.endpoint.linked_to, Some(CHANNEL_A));
    assert!(result.endpoint.locked);
    assert_ne!(result.endpoint.token, opened.token);
    assert_eq!(result.endpoint.token.len(), TOKEN_LEN);

    // Stored state is symmetric and locked on both sides
    let row_a = harness.repo.find_by_guild(GUILD_A).await.unwrap().unwrap();
    let row_b = harness.repo.find_by_guild(GUILD_B).await.unwrap().unwrap();
    assert_eq!(row_a.linked_to, Some(CHANNEL_B));
    assert!(row_a.locked);
    assert_eq!(row_b.linked_to, Some(CHANNEL_A));
    assert!(row_b.locked);
}

#[tokio::test]
async fn link_with_unknown_token_creates_nothing() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();

    let err = registry
        .link(GUILD_C, "Guild C", CHANNEL_C, "doesnotmatch")
        .await
        .unwrap_err();
    assert!(matches!(err, WormholeError::UnknownToken));

    let rows = harness.repo.all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].guild_id, GUILD_A);
    assert!(!rows[0].locked);
}

#[tokio::test]
async fn second_link_to_same_token_fails_locked() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    let err = registry
        .link(GUILD_C, "Guild C", CHANNEL_C, &opened.token)
        .await
        .unwrap_err();
    assert!(matches!(err, WormholeError::TokenLocked));
    assert_eq!(harness.repo.len(), 2);
}

#[tokio::test]
async fn link_to_manually_locked_token_fails() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry.lock(GUILD_A).await.unwrap();

    let err = registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap_err();
    assert!(matches!(err, WormholeError::TokenLocked));
}

// ============================================================================
// Unlink
// ============================================================================

#[tokio::test]
async fn unlink_restores_both_sides() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    let pair = registry.unlink(GUILD_A, CHANNEL_A).await.unwrap();
    assert_eq!(pair.local.guild_id, GUILD_A);
    assert_eq!(pair.remote.guild_id, GUILD_B);

    for guild in [GUILD_A, GUILD_B] {
        let row = harness.repo.find_by_guild(guild).await.unwrap().unwrap();
        assert!(!row.locked);
        assert_eq!(row.linked_to, None);
    }

    // Immediately unlinking again finds no link
    let err = registry.unlink(GUILD_A, CHANNEL_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::NoActiveLink));
}

#[tokio::test]
async fn unlink_works_from_the_linking_side_too() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    let pair = registry.unlink(GUILD_B, CHANNEL_B).await.unwrap();
    assert_eq!(pair.local.guild_id, GUILD_B);
    assert_eq!(pair.remote.guild_id, GUILD_A);

    let row_a = harness.repo.find_by_guild(GUILD_A).await.unwrap().unwrap();
    assert!(!row_a.locked);
    assert_eq!(row_a.linked_to, None);
}

// ============================================================================
// Lock / Unlock
// ============================================================================

#[tokio::test]
async fn lock_and_unlock_toggle_with_conflict_errors() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let err = registry.lock(GUILD_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::NoEndpoint(g) if g == GUILD_A));

    registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();

    let err = registry.unlock(GUILD_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::AlreadyUnlocked));

    registry.lock(GUILD_A).await.unwrap();
    let err = registry.lock(GUILD_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::AlreadyLocked));

    registry.unlock(GUILD_A).await.unwrap();
    let row = harness.repo.find_by_guild(GUILD_A).await.unwrap().unwrap();
    assert!(!row.locked);
}

#[tokio::test]
async fn unlock_fails_while_link_is_active() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    // Both sides are locked by the link; neither may unlock
    for guild in [GUILD_A, GUILD_B] {
        let err = registry.unlock(guild).await.unwrap_err();
        assert!(matches!(err, WormholeError::LinkActive));
    }
}

// ============================================================================
// Forward resolution
// ============================================================================

#[tokio::test]
async fn forward_direction_follows_reverse_lookup() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);
    harness.transport.add_channel(CHANNEL_A);
    harness.transport.add_channel(CHANNEL_B);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    // A message in A's channel forwards to B's channel: the destination is
    // the channel of the row whose linked_to names the sender.
    let dest = registry.resolve_forward_target(CHANNEL_A).await.unwrap();
    assert_eq!(dest, CHANNEL_B);

    // And the symmetric direction
    let dest = registry.resolve_forward_target(CHANNEL_B).await.unwrap();
    assert_eq!(dest, CHANNEL_A);
}

#[tokio::test]
async fn resolve_without_link_fails_no_wormhole() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    // Opened but never linked: no row references this channel as its target
    registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();

    let err = registry.resolve_forward_target(CHANNEL_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::NoWormhole));
}

#[tokio::test]
async fn resolve_fails_when_destination_channel_is_gone() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);
    // CHANNEL_B is never registered with the transport

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    let err = registry.resolve_forward_target(CHANNEL_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::TargetChannelMissing(c) if c == CHANNEL_B));

    // The record is left in place for manual correction
    assert!(harness.repo.find_by_guild(GUILD_B).await.unwrap().is_some());
}

// ============================================================================
// Views
// ============================================================================

#[tokio::test]
async fn info_reports_link_partner() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let err = registry.info(GUILD_A, CHANNEL_A).await.unwrap_err();
    assert!(matches!(err, WormholeError::NoEndpoint(_)));

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();

    let view = registry.info(GUILD_A, CHANNEL_A).await.unwrap();
    assert_eq!(view.guild_name, "Guild A");
    assert_eq!(view.channel_id, CHANNEL_A);
    assert_eq!(view.linked_guild_name, None);
    assert_eq!(view.mode, LinkMode::Explicit);

    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    let view = registry.info(GUILD_A, CHANNEL_A).await.unwrap();
    assert_eq!(view.linked_guild_name.as_deref(), Some("Guild B"));
}

#[tokio::test]
async fn token_view_reports_lock_state_and_partner() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();

    let view = registry.token(GUILD_A).await.unwrap();
    assert_eq!(view.token, opened.token);
    assert!(!view.locked);
    assert_eq!(view.linked_guild_name, None);

    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();

    let view = registry.token(GUILD_A).await.unwrap();
    assert!(view.locked);
    assert_eq!(view.linked_guild_name.as_deref(), Some("Guild B"));
}

// ============================================================================
// Drop all
// ============================================================================

#[tokio::test]
async fn drop_all_empties_the_table() {
    let harness = TestHarness::new();
    let registry = WormholeRegistry::new(&harness.ctx);

    let opened = registry.open(GUILD_A, "Guild A", CHANNEL_A).await.unwrap();
    registry
        .link(GUILD_B, "Guild B", CHANNEL_B, &opened.token)
        .await
        .unwrap();
    registry.open(GUILD_C, "Guild C", CHANNEL_C).await.unwrap();

    let removed = registry.drop_all().await.unwrap();
    assert_eq!(removed, 3);
    assert!(harness.repo.is_empty());

    for guild in [GUILD_A, GUILD_B, GUILD_C] {
        let err = registry.info(guild, CHANNEL_A).await.unwrap_err();
        assert!(matches!(err, WormholeError::NoEndpoint(_)));
    }
}
