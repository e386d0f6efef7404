//! Logging setup utilities for the Number Hunt clients.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Logs are written to stderr so they never interleave with the screen that
/// the terminal renderer draws on stdout. The log level can be overridden
/// using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "numberhunt", "numberhunt_admin")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use numberhunt_shared::logger::setup_logger;
///
/// setup_logger("numberhunt", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the default `EnvFilter` directive for the client library and the binary.
///
/// Binary names may contain `-`, which is not valid in a tracing target.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "numberhunt_client={},{}={}",
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level
    )
}
