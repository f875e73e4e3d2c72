//! Tracing setup.
//!
//! The engine only emits `tracing` events; installing a subscriber is the
//! embedding's choice. This helper wires the common case: an `EnvFilter`
//! honoring `RUST_LOG`, with a verbosity-derived default.

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "vitrine=warn",
        1 => "vitrine=info",
        2 => "vitrine=debug",
        _ => "vitrine=trace",
    }
}

/// Install a global fmt subscriber. Safe to call more than once; later
/// calls are no-ops (tests share one process).
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish()
        .try_init();
}
