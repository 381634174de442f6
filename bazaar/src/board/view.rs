//! View models of the three screens.
//!
//! Each screen is a pure function of the board state; front ends only draw
//! what these functions return.

use crate::marketplace::{category_options, location_options, Listing, ListingFilter, ListingForm};
use crate::traits::UserId;

use super::state::{BoardState, View};

pub const LOADING_MESSAGE: &str = "Loading services...";
pub const EMPTY_MESSAGE: &str = "No services found.";
pub const SIGNED_OUT_MESSAGE: &str = "Sign in to see the services offered in your community.";
pub const DISCONNECTED_MESSAGE: &str =
    "Could not reach the marketplace. Check the connection settings and restart.";

/// Landing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeModel<'a> {
    pub ready: bool,
    pub user_id: Option<&'a UserId>,
    pub listing_count: usize,
}

/// Registration form screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterModel<'a> {
    pub form: &'a ListingForm,
    pub submitting: bool,
    /// False while a submission is in flight or nobody is signed in
    pub can_submit: bool,
}

/// What the browse screen shows below its filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseBody<'a> {
    Loading,
    Disconnected,
    SignedOut,
    Empty,
    Listings(Vec<&'a Listing>),
}

impl BrowseBody<'_> {
    /// Placeholder message for the non-list states.
    pub const fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING_MESSAGE),
            Self::Disconnected => Some(DISCONNECTED_MESSAGE),
            Self::SignedOut => Some(SIGNED_OUT_MESSAGE),
            Self::Empty => Some(EMPTY_MESSAGE),
            Self::Listings(_) => None,
        }
    }
}

/// Browse and filter screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesModel<'a> {
    pub filter: &'a ListingFilter,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub body: BrowseBody<'a>,
}

/// The screen selected by the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<'a> {
    Home(HomeModel<'a>),
    Register(RegisterModel<'a>),
    Services(ServicesModel<'a>),
}

pub fn render(state: &BoardState) -> Screen<'_> {
    match state.view {
        View::Home => Screen::Home(home_model(state)),
        View::Register => Screen::Register(register_model(state)),
        View::Services => Screen::Services(services_model(state)),
    }
}

pub fn home_model(state: &BoardState) -> HomeModel<'_> {
    HomeModel {
        ready: state.identity.ready,
        user_id: state.identity.user_id.as_ref(),
        listing_count: state.listings.len(),
    }
}

pub fn register_model(state: &BoardState) -> RegisterModel<'_> {
    RegisterModel {
        form: &state.form,
        submitting: state.submitting,
        can_submit: !state.submitting
            && state.identity.connected
            && state.identity.user_id.is_some(),
    }
}

pub fn services_model(state: &BoardState) -> ServicesModel<'_> {
    let body = if state.loading {
        BrowseBody::Loading
    } else {
        let shown = state.filter.apply(&state.listings);
        if !shown.is_empty() {
            BrowseBody::Listings(shown)
        } else if state.listings.is_empty()
            && state.identity.ready
            && !state.identity.connected
        {
            BrowseBody::Disconnected
        } else if state.listings.is_empty() && state.identity.is_signed_out() {
            BrowseBody::SignedOut
        } else {
            BrowseBody::Empty
        }
    };

    ServicesModel {
        filter: &state.filter,
        categories: category_options(&state.listings),
        locations: location_options(&state.listings),
        body,
    }
}
