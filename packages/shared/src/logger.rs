//! Logger setup built on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for a binary.
///
/// Cargo binary names use hyphens while tracing targets use the crate's
/// module path, so `hiroba-server` becomes `hiroba_server`.
pub fn default_directive(bin_name: &str, level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!("{target}={level},hiroba_shared={level},tower_http={level}")
}

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive(bin_name, level)`
/// is used. An unparsable `RUST_LOG` falls back to the default directive and
/// is reported as a warning once the subscriber is installed. A second call
/// keeps the existing subscriber and logs the reason at debug level.
///
/// # Arguments
///
/// * `bin_name` - Binary name, usually `env!("CARGO_BIN_NAME")`
/// * `level` - Fallback log level (`trace`, `debug`, `info`, ...)
pub fn setup_logger(bin_name: &str, level: &str) {
    let env_value = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = resolve_filter(env_value.as_deref(), bin_name, level);

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();

    match result {
        Ok(()) => {
            if let Some(reason) = rejected {
                tracing::warn!(
                    "Ignoring invalid {}, using '{}': {}",
                    EnvFilter::DEFAULT_ENV,
                    default_directive(bin_name, level),
                    reason
                );
            }
        }
        Err(e) => tracing::debug!("Logger already initialised: {}", e),
    }
}

/// Pick the filter from the `RUST_LOG` value, falling back to the default
/// directive. The second element is the parse error of a rejected value.
fn resolve_filter(
    env_value: Option<&str>,
    bin_name: &str,
    level: &str,
) -> (EnvFilter, Option<String>) {
    let fallback = || EnvFilter::new(default_directive(bin_name, level));
    match env_value {
        Some(value) if !value.trim().is_empty() => match EnvFilter::try_new(value) {
            Ok(filter) => (filter, None),
            Err(e) => (fallback(), Some(e.to_string())),
        },
        _ => (fallback(), None),
    }
}
