//! The board controller: single owner of the session state.
//!
//! All mutations happen here, on one execution context. Backend callbacks
//! arrive as [`BoardEvent`]s, user actions as [`UiCommand`]s; after each one
//! the front end re-renders from [`Board::state`].

use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info};

use crate::config::BazaarConfig;
use crate::document::{DocumentId, StoreEvent};
use crate::error::BazaarResult;
use crate::marketplace::FormField;
use crate::session::{apply_identity_change, bootstrap, submit_listing, LiveSync};
use crate::traits::{AuthProvider, DocumentStore, IdentityStream, UserId};

use super::state::{BoardState, View};
use super::view::{render, Screen};

/// User actions the front end can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Navigate(View),
    EditField(FormField, String),
    SetSearch(String),
    SetCategory(String),
    SetLocation(String),
    ClearFilters,
    Submit,
    DismissNotification,
}

/// Completions delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Identity(Option<UserId>),
    Store(StoreEvent),
    /// The store ended the live subscription without an error
    StoreClosed,
}

enum Woken {
    Identity(Option<Option<UserId>>),
    Store(Option<StoreEvent>),
}

/// Marketplace board wired to an auth provider and a document store.
pub struct Board<A: AuthProvider, S: DocumentStore> {
    auth: A,
    store: S,
    initial_token: Option<String>,
    started: bool,
    state: BoardState,
    identity_rx: Option<IdentityStream>,
    sync: LiveSync,
}

impl<A: AuthProvider, S: DocumentStore> Board<A, S> {
    pub fn new(auth: A, store: S, config: &BazaarConfig) -> Self {
        Self {
            auth,
            store,
            initial_token: config.initial_auth_token.clone(),
            started: false,
            state: BoardState::default(),
            identity_rx: None,
            sync: LiveSync::new(config.collection_path()),
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn sync(&self) -> &LiveSync {
        &self.sync
    }

    /// The screen to draw for the current state.
    pub fn screen(&self) -> Screen<'_> {
        render(&self.state)
    }

    /// Run Identity Bootstrap. Only the first call does anything.
    pub async fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(path = %self.sync.path(), "Starting marketplace board");

        let token = self.initial_token.take();
        self.identity_rx = bootstrap(&self.auth, token.as_deref(), &mut self.state).await;
        self.sync.reconcile(&self.store, &mut self.state);
    }

    /// Wait for the next backend event.
    ///
    /// Pends forever while neither the identity listener nor a subscription
    /// is active, so it can sit in a `select!` next to the command channel.
    pub async fn next_event(&mut self) -> BoardEvent {
        loop {
            let listening = self.identity_rx.is_some();
            let woken = tokio::select! {
                identity = recv_identity(&mut self.identity_rx), if listening => Woken::Identity(identity),
                event = self.sync.recv() => Woken::Store(event),
            };
            match woken {
                Woken::Identity(Some(identity)) => return BoardEvent::Identity(identity),
                Woken::Identity(None) => {
                    debug!("Identity listener closed");
                    self.identity_rx = None;
                }
                Woken::Store(Some(event)) => return BoardEvent::Store(event),
                Woken::Store(None) => return BoardEvent::StoreClosed,
            }
        }
    }

    pub fn handle_event(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::Identity(identity) => {
                apply_identity_change(&mut self.state, identity);
                self.sync.reconcile(&self.store, &mut self.state);
            }
            BoardEvent::Store(event) => self.sync.apply(event, &mut self.state),
            BoardEvent::StoreClosed => self.sync.closed(&mut self.state),
        }
    }

    /// Handle every event that is already queued, without waiting.
    ///
    /// Returns the number of events handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            if let Some(identity) = self.try_identity() {
                self.handle_event(BoardEvent::Identity(identity));
            } else if let Some(event) = self.sync.try_recv() {
                self.handle_event(BoardEvent::Store(event));
            } else {
                return handled;
            }
            handled += 1;
        }
    }

    pub async fn dispatch(&mut self, command: UiCommand) {
        match command {
            UiCommand::Navigate(view) => self.navigate(view),
            UiCommand::EditField(field, value) => self.state.form.set(field, value),
            UiCommand::SetSearch(text) => self.state.filter.search = text,
            UiCommand::SetCategory(text) => self.state.filter.category = text,
            UiCommand::SetLocation(text) => self.state.filter.location = text,
            UiCommand::ClearFilters => self.state.filter = Default::default(),
            UiCommand::Submit if !self.accepts_submit() => {
                debug!(view = ?self.state.view, "Ignoring stale submit");
            }
            UiCommand::Submit => {
                if let Err(e) = self.submit().await {
                    debug!("Submission did not complete: {e}");
                }
            }
            UiCommand::DismissNotification => self.state.notification.dismiss(),
        }
    }

    pub fn navigate(&mut self, view: View) {
        if self.state.view != view {
            debug!(?view, "Navigating");
            self.state.view = view;
        }
    }

    /// Whether a `Submit` command would reach the form.
    ///
    /// Submits queued behind a completed one arrive after the board has
    /// left the registration view and are dropped.
    pub fn accepts_submit(&self) -> bool {
        self.state.view == View::Register && !self.state.submitting
    }

    pub async fn submit(&mut self) -> BazaarResult<DocumentId> {
        submit_listing(&self.store, self.sync.path(), &mut self.state).await
    }

    /// Release the subscription and the identity listener.
    pub fn shutdown(&mut self) {
        self.sync.release();
        self.identity_rx = None;
    }

    fn try_identity(&mut self) -> Option<Option<UserId>> {
        let rx = self.identity_rx.as_mut()?;
        match rx.try_recv() {
            Ok(identity) => Some(identity),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.identity_rx = None;
                None
            }
        }
    }
}

async fn recv_identity(rx: &mut Option<IdentityStream>) -> Option<Option<UserId>> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
