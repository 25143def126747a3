//! Logging setup.
//!
//! Logs go to stderr so they never interleave with the conversation on
//! stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when neither `RUST_LOG` nor `--log-level` is given
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing with the bot defaults.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Initialize tracing with a custom default filter.
///
/// `RUST_LOG` wins over `default_filter` when it is set and valid.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
