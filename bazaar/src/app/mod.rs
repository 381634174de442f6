//! Desktop front end for the marketplace board.

pub mod components;
pub mod state;

pub use components::app;
pub use state::CONFIG;
