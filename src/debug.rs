//! Debug logging: a `tracing`-based stderr subscriber gated on `FO_DEBUG`.
//!
//! Grounded in `freddiehaddad-oxidized`'s `EnvFilter::from_default_env()` +
//! `.with_writer(...)` pattern. Unlike the teacher repo, which declares
//! `tracing`/`tracing-subscriber` but never wires them up, this module
//! actually initializes the subscriber.

use std::io;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber exactly once. No-op (and emits
/// no output) unless `FO_DEBUG` is set in the environment; the filter
/// level still respects `RUST_LOG` when both are present.
pub fn init() {
    if std::env::var_os("FO_DEBUG").is_none() {
        return;
    }
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    });
}
