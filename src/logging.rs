//! Diagnostic logging for the crate's own events.
//!
//! Library code only emits `tracing` events. Binaries call [`init_logging`]
//! once to install a subscriber writing to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostics filter directive.
pub const LOG_ENV: &str = "MELD_LOG";

/// Builds the diagnostics filter from `MELD_LOG`, falling back to `default_filter`.
pub fn build_env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Installs a stderr fmt subscriber for diagnostics.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}
