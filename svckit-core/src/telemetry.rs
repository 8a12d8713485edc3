//! Internal diagnostics setup.
//!
//! svckit's own operational messages (rotation events, prune
//! failures) go through `tracing`, separate from the application log
//! streams. Services call [`init`] once at startup.

use tracing_subscriber::EnvFilter;

/// Initialize the fmt subscriber with `RUST_LOG` or the given
/// fallback level. Safe to call more than once; later calls are
/// no-ops.
pub fn init(fallback_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(fallback_level)),
        )
        .with_target(false)
        .try_init();
}
