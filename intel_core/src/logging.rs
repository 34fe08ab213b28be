//! Tracing bootstrap for binaries and tests that embed the intel core.
//!
//! The core itself only emits `tracing` events; installing a subscriber is
//! the caller's decision and happens at most once per process.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "intel_core=info,star_map=info";

/// Install a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`.
///
/// Returns `true` if this call installed the subscriber and `false` if one
/// was already set. Never panics on repeated calls.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
