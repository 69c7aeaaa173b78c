//! Logging setup

use crate::config::Verbosity;
use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber; `RUST_LOG` overrides the verbosity level
pub fn init_logging(verbosity: Verbosity, color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    // a subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(color)
        .try_init();
}
