//! Board test harness.
//!
//! Wires a `Board` to `MockAuth` and `MockStore` and exposes helpers to
//! drive it through commands and backend events.

use bazaar::board::{services_model, BrowseBody};
use bazaar::marketplace::listing::fields;
use bazaar::mocks::{MockAuth, MockStore, MockTime};
use bazaar::{
    BazaarConfig, Board, BoardState, CollectionPath, Document, DocumentId, FieldValue, Fields,
    FormField, Notification, UiCommand, View,
};

/// Store document shaped like a registered listing.
pub fn listing_doc(id: &str, name: &str, kind: &str, location: &str) -> Document {
    let mut f = Fields::new();
    f.insert(fields::NAME.into(), FieldValue::from(name));
    f.insert(fields::SERVICE_TYPE.into(), FieldValue::from(kind));
    f.insert(
        fields::DESCRIPTION.into(),
        FieldValue::from(format!("{kind} services by {name}")),
    );
    f.insert(fields::LOCATION.into(), FieldValue::from(location));
    f.insert(fields::CONTACT.into(), FieldValue::from("555-0100"));
    f.insert(fields::OWNER_ID.into(), FieldValue::from("seed-owner"));
    f.insert(fields::CREATED_AT.into(), FieldValue::Timestamp(1_700_000_000));
    Document::new(DocumentId::new(id), f)
}

pub struct BoardHarness {
    pub board: Board<MockAuth, MockStore>,
    pub auth: MockAuth,
    pub store: MockStore,
    pub time: MockTime,
    pub path: CollectionPath,
}

#[allow(dead_code)]
impl BoardHarness {
    pub fn new() -> Self {
        Self::with_config(BazaarConfig::default())
    }

    pub fn with_config(config: BazaarConfig) -> Self {
        let auth = MockAuth::new();
        let time = MockTime::default();
        let store = MockStore::with_time(time.clone());
        let board = Board::new(auth.clone(), store.clone(), &config);
        Self {
            board,
            auth,
            store,
            time,
            path: config.collection_path(),
        }
    }

    /// Start the board and handle everything the start queued up.
    pub async fn start(&mut self) {
        self.board.start().await;
        self.settle();
    }

    /// A board that has already signed in anonymously and synced.
    pub async fn started() -> Self {
        let mut harness = Self::new();
        harness.start().await;
        harness
    }

    pub fn settle(&mut self) -> usize {
        self.board.process_pending()
    }

    pub fn state(&self) -> &BoardState {
        self.board.state()
    }

    pub fn seed(&self, id: &str, name: &str, kind: &str, location: &str) {
        self.store
            .seed(&self.path, listing_doc(id, name, kind, location));
    }

    pub async fn send(&mut self, command: UiCommand) {
        self.board.dispatch(command).await;
        self.settle();
    }

    /// Type values into the form, in field order.
    pub async fn fill_form(&mut self, values: [&str; 5]) {
        for (field, value) in FormField::ALL.into_iter().zip(values) {
            self.board
                .dispatch(UiCommand::EditField(field, value.to_string()))
                .await;
        }
    }

    pub async fn fill_valid_form(&mut self) {
        self.fill_form(["Carla", "Jardineira", "Cuido de jardins", "Sul", "555-0199"])
            .await;
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.state().notification.current()
    }

    /// Names shown on the browse screen, in order.
    pub fn shown_names(&self) -> Vec<String> {
        match services_model(self.state()).body {
            BrowseBody::Listings(shown) => shown.iter().map(|l| l.name.clone()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn browse_body_placeholder(&self) -> Option<&'static str> {
        services_model(self.state()).body.placeholder()
    }

    pub fn view(&self) -> View {
        self.state().view
    }
}
