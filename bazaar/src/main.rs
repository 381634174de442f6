//! Community services board - desktop entry point.
// Dioxus rsx! macro generates deeply nested types requiring higher recursion limit
#![recursion_limit = "512"]

mod app;

use bazaar::{BazaarConfig, BazaarResult};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::CONFIG;

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> BazaarResult<()> {
    init_logging();

    let config = BazaarConfig::from_env();
    info!(
        app_id = %config.app_id,
        collection = %config.collection_path(),
        "Starting community services board"
    );
    if config.provider.is_empty() {
        warn!("No backend configuration found; the board will start disconnected");
    }
    CONFIG.set(config).ok();

    // Blocks until the window is closed
    dioxus::launch(app::app);

    info!("UI closed, shutting down...");
    Ok(())
}
