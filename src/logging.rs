//! Logging Setup
//!
//! Registry-based tracing initialization for embedding applications.
//! `RUST_LOG` takes precedence over the requested default level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber. Call once at startup; a second
/// call is a no-op because the global default is already set.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
