//! Logging setup utilities for the watch party binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the watch party crates and the binary itself log at `default_log_level`
/// unless the `RUST_LOG` environment variable says otherwise.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "watchparty-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use watchparty_shared::logger::setup_logger;
///
/// setup_logger("watchparty-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut directives = vec![
        format!("watchparty_server={}", default_log_level),
        format!("watchparty_client={}", default_log_level),
        format!("watchparty_shared={}", default_log_level),
        format!("tower_http={}", default_log_level),
    ];
    if !directives.iter().any(|d| d.starts_with(&format!("{}=", binary_target))) {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }
    directives.join(",")
}
