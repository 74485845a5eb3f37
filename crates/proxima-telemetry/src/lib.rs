//! Logging setup for the Proxima command-line client
//!
//! Installs a `tracing-subscriber` registry writing to stderr so that
//! command output on stdout stays machine-readable

use proxima_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::EnvFilter;

/// Filter used when nothing else is configured
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize logging
///
/// The filter is taken from `override_filter`, then the config file, then
/// `RUST_LOG`, then [`DEFAULT_FILTER`]. An unparseable directive falls back
/// to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &TelemetryConfig, override_filter: Option<&str>) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = build_filter(config, override_filter, std::env::var("RUST_LOG").ok().as_deref());

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

/// Pick the filter directive by precedence
fn build_filter(config: &TelemetryConfig, override_filter: Option<&str>, env_filter: Option<&str>) -> EnvFilter {
    let directive = override_filter
        .or(config.log_filter.as_deref())
        .or(env_filter)
        .unwrap_or(DEFAULT_FILTER);

    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}
