//! Live Collection Sync through the board.

use bazaar::board::view::EMPTY_MESSAGE;
use bazaar::mocks::MockStoreFailure;
use bazaar::{DocumentId, NotificationKind, UserId};

use crate::common::BoardHarness;

fn ids(h: &BoardHarness) -> Vec<String> {
    h.state()
        .listings
        .iter()
        .map(|l| l.id.as_str().to_string())
        .collect()
}

#[tokio::test]
async fn test_initial_snapshot_fills_mirror() {
    let mut h = BoardHarness::new();
    h.seed("a", "Ana", "Costureira", "Centro");
    h.seed("b", "Bea", "Eletricista", "Norte");

    h.start().await;

    assert_eq!(ids(&h), vec!["a", "b"]);
    assert_eq!(h.state().listings[1].name, "Bea");
    assert_eq!(h.state().listings[1].owner_id, "seed-owner");
}

#[tokio::test]
async fn test_out_of_band_changes_replace_the_mirror() {
    let mut h = BoardHarness::new();
    h.seed("a", "Ana", "Costureira", "Centro");
    h.seed("b", "Bea", "Eletricista", "Norte");
    h.start().await;

    assert!(h.store.remove(&h.path, &DocumentId::new("a")));
    h.seed("c", "Caio", "Pedreiro", "Sul");
    assert_eq!(h.settle(), 2);

    assert_eq!(ids(&h), vec!["b", "c"]);
}

#[tokio::test]
async fn test_subscription_error_keeps_last_mirror() {
    let mut h = BoardHarness::new();
    h.seed("a", "Ana", "Costureira", "Centro");
    h.start().await;

    h.store.fail_subscriptions(&h.path, "permission denied");
    h.settle();

    let note = h.notification().unwrap();
    assert_eq!(note.kind, NotificationKind::Error);
    assert!(note.text.contains("permission denied"));
    assert_eq!(ids(&h), vec!["a"]);
    assert!(!h.state().loading);
    assert!(h.board.sync().is_halted());
    assert!(!h.board.sync().is_active());
}

#[tokio::test]
async fn test_no_retry_until_activation_lapses() {
    let mut h = BoardHarness::started().await;
    h.store.fail_subscriptions(&h.path, "unavailable");
    h.settle();

    // same identity again: still halted
    h.auth.switch_user(UserId::new("anon-1"));
    h.seed("late", "Lia", "Cozinheira", "Centro");
    h.settle();
    assert_eq!(h.store.subscribe_calls(), 1);
    assert!(h.state().listings.is_empty());

    h.auth.sign_out();
    h.auth.switch_user(UserId::new("anon-1"));
    h.settle();

    assert_eq!(h.store.subscribe_calls(), 2);
    assert_eq!(ids(&h), vec!["late"]);
    assert!(!h.board.sync().is_halted());
}

#[tokio::test]
async fn test_failed_first_subscription_shows_empty_state() {
    let mut h = BoardHarness::new();
    h.store.set_fail_mode(Some(MockStoreFailure::Subscriptions));

    h.start().await;

    assert!(!h.state().loading);
    assert!(h.state().listings.is_empty());
    assert!(h
        .notification()
        .unwrap()
        .text
        .starts_with("Could not load services"));
    assert_eq!(h.browse_body_placeholder(), Some(EMPTY_MESSAGE));
}

#[tokio::test]
async fn test_next_event_delivers_pushed_snapshot() {
    let mut h = BoardHarness::started().await;
    h.seed("a", "Ana", "Costureira", "Centro");

    let event = h.board.next_event().await;
    h.board.handle_event(event);

    assert_eq!(ids(&h), vec!["a"]);
}
