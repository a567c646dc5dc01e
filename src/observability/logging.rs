//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the `pacer` binary
//! - Let `RUST_LOG` override the level given on the command line
//!
//! # Design Decisions
//! - The library only emits `tracing` events; installing a subscriber is the
//!   binary's job
//! - Wrapper internals log at `debug`/`trace` so replays stay quiet at `info`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `default_filter` applies when `RUST_LOG` is unset.
///
/// Calling this twice is harmless; the second installation is ignored.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
