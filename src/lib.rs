// Engine Bridge - native glue between a managed-language runtime and a game engine
// Thread registration, event forwarding, and the blocking execution entry point

pub mod api;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod runtime;
pub mod status;

// Re-exports for convenience
pub use api::*;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static LOG_INIT: Once = Once::new();

/// Initialize logging once for the process, with an explicit filter override.
///
/// Filter selection order: the `filter` argument if given, then the
/// `RUST_LOG` environment variable, then `"info"`. Safe to call repeatedly;
/// later calls are no-ops.
pub fn init_logging_with_filter(filter: Option<&str>) {
    LOG_INIT.call_once(|| {
        let env_filter = match filter {
            Some(spec) => EnvFilter::new(spec),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };

        // try_init: the host process or a test harness may already have
        // installed a global subscriber
        if tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .try_init()
            .is_err()
        {
            tracing::debug!("global subscriber already installed, keeping it");
        }
    });
}

/// Initialize logging from the environment (`RUST_LOG`, default `info`).
pub fn init_logging() {
    init_logging_with_filter(None);
}
