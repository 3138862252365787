//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with rendered output. The filter is
//! read from `SPRIG_LOG` using the usual `tracing` directive syntax
//! (`debug`, `sprig_values=trace`, ...); without it only warnings show.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SPRIG_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `SPRIG_LOG`, falling back to warnings only.
pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
