//! Main -> Dioxus handoff.
//!
//! The root component has no arguments, so the configuration loaded in
//! `main` reaches it through a `OnceLock` set before launch.

use std::sync::OnceLock;

use bazaar::BazaarConfig;

pub static CONFIG: OnceLock<BazaarConfig> = OnceLock::new();
