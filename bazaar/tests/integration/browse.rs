//! Browsing and filtering the mirror.

use bazaar::board::view::{EMPTY_MESSAGE, LOADING_MESSAGE};
use bazaar::board::services_model;
use bazaar::UiCommand;

use crate::common::BoardHarness;

async fn community() -> BoardHarness {
    let mut h = BoardHarness::new();
    h.seed("a", "Ana", "Costureira", "Centro");
    h.seed("b", "Bea", "Eletricista", "Norte");
    h.seed("c", "Caio", "Costureira", "Norte");
    h.start().await;
    h
}

#[tokio::test]
async fn test_unfiltered_browse_shows_every_listing() {
    let h = community().await;
    assert_eq!(h.shown_names(), vec!["Ana", "Bea", "Caio"]);
}

#[tokio::test]
async fn test_filters_combine() {
    let mut h = community().await;

    h.send(UiCommand::SetCategory("costur".into())).await;
    assert_eq!(h.shown_names(), vec!["Ana", "Caio"]);

    h.send(UiCommand::SetLocation("NORTE".into())).await;
    assert_eq!(h.shown_names(), vec!["Caio"]);

    h.send(UiCommand::SetSearch("ana".into())).await;
    assert!(h.shown_names().is_empty());
    assert_eq!(h.browse_body_placeholder(), Some(EMPTY_MESSAGE));

    h.send(UiCommand::ClearFilters).await;
    assert_eq!(h.shown_names().len(), 3);
}

#[tokio::test]
async fn test_search_matches_literal_field_values() {
    let mut h = community().await;

    // "Bea" and "Eletricista" contain an "a", so Bea matches too
    h.send(UiCommand::SetSearch("a".into())).await;
    assert_eq!(h.shown_names(), vec!["Ana", "Bea", "Caio"]);

    h.send(UiCommand::SetSearch("eletri".into())).await;
    assert_eq!(h.shown_names(), vec!["Bea"]);
}

#[tokio::test]
async fn test_option_lists_follow_the_mirror() {
    let mut h = community().await;

    let model = services_model(h.state());
    assert_eq!(model.categories, vec!["Costureira", "Eletricista"]);
    assert_eq!(model.locations, vec!["Centro", "Norte"]);

    h.seed("d", "Davi", "Pintor", "Leste");
    h.settle();

    let model = services_model(h.state());
    assert_eq!(model.categories, vec!["Costureira", "Eletricista", "Pintor"]);
    assert_eq!(model.locations, vec!["Centro", "Leste", "Norte"]);
}

#[tokio::test]
async fn test_empty_collection_shows_empty_message() {
    let h = BoardHarness::started().await;

    assert!(!h.state().loading);
    assert_eq!(h.browse_body_placeholder(), Some(EMPTY_MESSAGE));
}

#[tokio::test]
async fn test_loading_until_first_snapshot() {
    let h = BoardHarness::new();
    assert_eq!(h.browse_body_placeholder(), Some(LOADING_MESSAGE));
}
