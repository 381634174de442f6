//! Presentation layer: session state, notifications, view models and the
//! controller that owns them.

pub mod controller;
pub mod notification;
pub mod state;
pub mod view;

pub use controller::{Board, BoardEvent, UiCommand};
pub use notification::{Notification, NotificationKind, NotificationSlot};
pub use state::{BoardState, IdentityState, View};
pub use view::{
    home_model, register_model, render, services_model, BrowseBody, HomeModel, RegisterModel,
    Screen, ServicesModel,
};
