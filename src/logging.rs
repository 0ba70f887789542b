//! Tracing initialization for binaries and tests embedding this crate.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber. Honors `RUST_LOG`, defaulting
/// to `info`. Safe to call once per process; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
