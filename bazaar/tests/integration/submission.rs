//! Listing Submission through the board.

use bazaar::marketplace::listing::fields;
use bazaar::mocks::{MockAuthFailure, MockStoreFailure};
use bazaar::session::submission::SUCCESS_MESSAGE;
use bazaar::{BazaarError, FieldValue, ListingForm, NotificationKind, UiCommand, View};

use crate::common::BoardHarness;

#[tokio::test]
async fn test_successful_submission_clears_form_and_shows_services() {
    let mut h = BoardHarness::started().await;
    h.send(UiCommand::Navigate(View::Register)).await;
    h.fill_valid_form().await;

    let id = h.board.submit().await.unwrap();

    assert_eq!(h.view(), View::Services);
    assert_eq!(h.state().form, ListingForm::default());
    assert!(!h.state().submitting);
    let note = h.notification().unwrap();
    assert_eq!(note.kind, NotificationKind::Success);
    assert_eq!(note.text, SUCCESS_MESSAGE);

    // no optimistic insert: the record arrives with the next snapshot
    assert!(h.state().listings.is_empty());
    h.settle();
    assert_eq!(h.state().listings.len(), 1);
    let listing = &h.state().listings[0];
    assert_eq!(listing.id, id);
    assert_eq!(listing.name, "Carla");
    assert_eq!(listing.owner_id, "anon-1");
    assert_eq!(listing.created_at, Some(1_704_067_200));
}

#[tokio::test]
async fn test_repeated_submit_keeps_success_notification() {
    let mut h = BoardHarness::started().await;
    h.send(UiCommand::Navigate(View::Register)).await;
    h.fill_valid_form().await;

    // a double click queues a second submit behind the first
    h.send(UiCommand::Submit).await;
    h.send(UiCommand::Submit).await;

    assert_eq!(h.view(), View::Services);
    assert_eq!(h.store.append_calls(), 1);
    assert_eq!(h.store.documents(&h.path).len(), 1);
    let note = h.notification().unwrap();
    assert_eq!(note.kind, NotificationKind::Success);
    assert_eq!(note.text, SUCCESS_MESSAGE);
}

#[tokio::test]
async fn test_submit_outside_registration_view_is_ignored() {
    let mut h = BoardHarness::started().await;
    h.fill_valid_form().await;
    assert!(!h.board.accepts_submit());

    h.send(UiCommand::Submit).await;

    assert_eq!(h.store.append_calls(), 0);
    assert!(h.notification().is_none());
    assert_eq!(h.state().form.name, "Carla");
}

#[tokio::test]
async fn test_stored_record_carries_owner_and_server_time() {
    let mut h = BoardHarness::started().await;
    h.time.set(1_800_000_000);
    h.send(UiCommand::Navigate(View::Register)).await;
    h.fill_valid_form().await;

    h.send(UiCommand::Submit).await;

    let docs = h.store.documents(&h.path);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].get(fields::OWNER_ID), Some(&FieldValue::from("anon-1")));
    assert_eq!(docs[0].get(fields::SERVICE_TYPE), Some(&FieldValue::from("Jardineira")));
    assert_eq!(
        docs[0].get(fields::CREATED_AT),
        Some(&FieldValue::Timestamp(1_800_000_000))
    );
}

#[tokio::test]
async fn test_append_failure_preserves_form() {
    let mut h = BoardHarness::started().await;
    h.send(UiCommand::Navigate(View::Register)).await;
    h.fill_valid_form().await;
    let before = h.state().form.clone();
    h.store.set_fail_mode(Some(MockStoreFailure::Appends));

    let result = h.board.submit().await;

    assert!(matches!(result, Err(BazaarError::Store(_))));
    assert_eq!(h.state().form, before);
    assert_eq!(h.view(), View::Register);
    assert!(!h.state().submitting);
    let note = h.notification().unwrap();
    assert_eq!(note.kind, NotificationKind::Error);
    assert!(note.text.contains("simulated append failure"));
}

#[tokio::test]
async fn test_incomplete_form_never_reaches_the_store() {
    let mut h = BoardHarness::started().await;
    h.fill_form(["Carla", "Jardineira", "", "Sul", "555-0199"]).await;

    let result = h.board.submit().await;

    assert!(matches!(result, Err(BazaarError::Validation(_))));
    assert_eq!(h.store.append_calls(), 0);
    assert!(h.notification().unwrap().text.contains("Description"));
    assert_eq!(h.state().form.name, "Carla");
}

#[tokio::test]
async fn test_whitespace_only_field_counts_as_missing() {
    let mut h = BoardHarness::started().await;
    h.fill_form(["Carla", "Jardineira", "Cuido de jardins", "   ", "555-0199"])
        .await;

    assert!(h.board.submit().await.is_err());
    assert_eq!(h.store.append_calls(), 0);
}

#[tokio::test]
async fn test_submission_without_identity_is_rejected() {
    let mut h = BoardHarness::new();
    h.auth.set_fail_mode(Some(MockAuthFailure::SignIn));
    h.start().await;
    h.fill_valid_form().await;

    let result = h.board.submit().await;

    assert!(matches!(result, Err(BazaarError::Auth(_))));
    assert_eq!(h.store.append_calls(), 0);
    assert!(h
        .notification()
        .unwrap()
        .text
        .starts_with("Cannot register a service right now"));
}

#[tokio::test]
async fn test_submission_while_disconnected_is_rejected() {
    let mut h = BoardHarness::new();
    h.auth.set_fail_mode(Some(MockAuthFailure::Initialize));
    h.start().await;
    h.fill_valid_form().await;

    assert!(matches!(
        h.board.submit().await,
        Err(BazaarError::Store(_))
    ));
    assert_eq!(h.store.append_calls(), 0);
}

#[tokio::test]
async fn test_later_notification_replaces_earlier_one() {
    let mut h = BoardHarness::started().await;
    h.store.fail_subscriptions(&h.path, "quota exceeded");
    h.settle();
    assert!(h.notification().unwrap().text.contains("quota exceeded"));

    h.store.set_fail_mode(Some(MockStoreFailure::Appends));
    h.send(UiCommand::Navigate(View::Register)).await;
    h.fill_valid_form().await;
    h.send(UiCommand::Submit).await;

    let note = h.notification().unwrap();
    assert!(note.text.starts_with("Could not register the service"));
    assert!(!note.text.contains("quota exceeded"));

    h.send(UiCommand::DismissNotification).await;
    assert!(h.notification().is_none());
}
