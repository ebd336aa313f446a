//! Logging - tracing subscriber for the CLI
//!
//! Priority: RUST_LOG env var > --debug flag > default "info".
//! Output goes to stderr so stdout stays machine-readable JSON.

use tracing_subscriber::EnvFilter;

use crate::DEFAULT_LOG_LEVEL;

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(debug: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();

    tracing::debug!(engine = crate::ENGINE_VERSION, "Logging initialised");
}
