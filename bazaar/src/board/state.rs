//! UI session state.
//!
//! Everything here is local to one run of the board: nothing is persisted
//! and a reload starts from [`BoardState::default`]. The state is owned by
//! the single execution context driving the board and handed to the view
//! functions by reference.

use crate::marketplace::{Listing, ListingFilter, ListingForm};
use crate::traits::UserId;

use super::notification::NotificationSlot;

/// The three interchangeable screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Home,
    Register,
    Services,
}

/// What Identity Bootstrap has established so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityState {
    /// Set after the first identity notification or a bootstrap failure
    pub ready: bool,
    pub user_id: Option<UserId>,
    /// Whether the backend connection was initialised
    pub connected: bool,
}

impl IdentityState {
    /// Ready, but nobody is signed in.
    pub fn is_signed_out(&self) -> bool {
        self.ready && self.user_id.is_none()
    }
}

/// Full UI session state of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub view: View,
    pub identity: IdentityState,
    /// Local mirror of the listings collection
    pub listings: Vec<Listing>,
    /// True until the first snapshot of the current subscription arrives
    pub loading: bool,
    pub form: ListingForm,
    pub submitting: bool,
    pub filter: ListingFilter,
    pub notification: NotificationSlot,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            view: View::default(),
            identity: IdentityState::default(),
            listings: Vec::new(),
            loading: true,
            form: ListingForm::default(),
            submitting: false,
            filter: ListingFilter::default(),
            notification: NotificationSlot::default(),
        }
    }
}
