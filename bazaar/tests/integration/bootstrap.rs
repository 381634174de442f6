//! Identity Bootstrap through the board.

use bazaar::board::view::{DISCONNECTED_MESSAGE, SIGNED_OUT_MESSAGE};
use bazaar::mocks::MockAuthFailure;
use bazaar::{BazaarConfig, NotificationKind, UiCommand, UserId, View};

use crate::common::BoardHarness;

#[tokio::test]
async fn test_anonymous_sign_in_activates_sync() {
    let h = BoardHarness::started().await;

    assert!(h.state().identity.ready);
    assert!(h.state().identity.connected);
    assert_eq!(h.state().identity.user_id, Some(UserId::new("anon-1")));
    assert!(h.board.sync().is_active());
    assert!(!h.state().loading);
    assert!(h.notification().is_none());
    assert_eq!(h.auth.anonymous_sign_ins(), 1);
    assert_eq!(h.auth.token_sign_ins(), 0);
}

#[tokio::test]
async fn test_custom_token_is_redeemed_instead_of_anonymous_session() {
    let config = BazaarConfig {
        initial_auth_token: Some("one-time".into()),
        ..BazaarConfig::default()
    };
    let mut h = BoardHarness::with_config(config);
    h.auth.register_token("one-time", UserId::new("member-7"));

    h.start().await;

    assert_eq!(h.auth.token_sign_ins(), 1);
    assert_eq!(h.auth.anonymous_sign_ins(), 0);
    assert_eq!(h.state().identity.user_id, Some(UserId::new("member-7")));
    assert!(h.board.sync().is_active());
}

#[tokio::test]
async fn test_rejected_token_does_not_fall_back_to_anonymous() {
    let config = BazaarConfig {
        initial_auth_token: Some("expired".into()),
        ..BazaarConfig::default()
    };
    let mut h = BoardHarness::with_config(config);

    h.start().await;

    assert_eq!(h.auth.token_sign_ins(), 1);
    assert_eq!(h.auth.anonymous_sign_ins(), 0);
    assert!(h.state().identity.ready);
    assert!(h.state().identity.user_id.is_none());
    let note = h.notification().unwrap();
    assert_eq!(note.kind, NotificationKind::Error);
    assert!(note.text.starts_with("Sign-in failed"));
}

#[tokio::test]
async fn test_failed_anonymous_sign_in_still_unblocks_the_board() {
    let mut h = BoardHarness::new();
    h.auth.set_fail_mode(Some(MockAuthFailure::SignIn));

    h.start().await;

    assert!(h.state().identity.ready);
    assert!(!h.state().loading);
    assert!(!h.board.sync().is_active());
    assert_eq!(h.store.subscribe_calls(), 0);
    assert_eq!(h.notification().unwrap().kind, NotificationKind::Error);

    h.send(UiCommand::Navigate(View::Services)).await;
    assert_eq!(h.browse_body_placeholder(), Some(SIGNED_OUT_MESSAGE));
}

#[tokio::test]
async fn test_initialisation_failure_skips_sign_in() {
    let mut h = BoardHarness::new();
    h.auth.set_fail_mode(Some(MockAuthFailure::Initialize));

    h.start().await;

    assert!(h.state().identity.ready);
    assert!(!h.state().identity.connected);
    assert_eq!(h.auth.anonymous_sign_ins(), 0);
    assert_eq!(h.auth.listener_count(), 0);
    assert!(h
        .notification()
        .unwrap()
        .text
        .starts_with("Could not connect to the marketplace"));
    assert_eq!(h.settle(), 0);

    h.send(UiCommand::Navigate(View::Services)).await;
    assert_eq!(h.browse_body_placeholder(), Some(DISCONNECTED_MESSAGE));
}

#[tokio::test]
async fn test_sign_out_releases_subscription_and_keeps_mirror() {
    let mut h = BoardHarness::new();
    h.seed("a", "Ana", "Costureira", "Centro");
    h.start().await;
    assert_eq!(h.store.active_subscriptions(&h.path), 1);

    h.auth.sign_out();
    h.settle();

    assert!(!h.board.sync().is_active());
    assert_eq!(h.store.active_subscriptions(&h.path), 0);
    assert_eq!(h.state().listings.len(), 1);
    assert!(!h.state().loading);

    h.auth.switch_user(UserId::new("anon-9"));
    h.settle();

    assert!(h.board.sync().is_active());
    assert_eq!(h.store.active_subscriptions(&h.path), 1);
    assert_eq!(h.store.subscribe_calls(), 2);
}

#[tokio::test]
async fn test_repeated_identity_does_not_duplicate_subscription() {
    let mut h = BoardHarness::started().await;

    h.auth.switch_user(UserId::new("anon-1"));
    h.settle();

    assert_eq!(h.store.subscribe_calls(), 1);
    assert_eq!(h.store.active_subscriptions(&h.path), 1);
}
