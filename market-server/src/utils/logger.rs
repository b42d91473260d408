//! Logging Infrastructure
//!
//! Structured logging setup. `RUST_LOG` overrides the default level.

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
