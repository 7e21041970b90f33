//! Console logging setup
//!
//! The core itself only emits `tracing` events; installing a subscriber is
//! the embedding application's job. This helper covers the common case:
//! console output with a `RUST_LOG`-controlled filter (default: info).

use tracing_subscriber::EnvFilter;

/// Initialize console logging. Safe to call more than once; later calls
/// are no-ops if a global subscriber is already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
