use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// Output goes to stderr so that stdout stays reserved for protocol
/// responses. The filter comes from `RUST_LOG` and defaults to `info`.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing(json: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(false))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_ansi(false))
            .try_init()?;
    }
    Ok(())
}

/// Log the outcome of an operation with structured fields.
///
/// `error_kind` is the stable kind label; never pass argument values here.
#[inline]
pub fn log_command_execution(
    operation: &str,
    elapsed: Duration,
    success: bool,
    error_kind: Option<&str>,
) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(operation, duration_ms, "operation_execution_success");
    } else {
        warn!(operation, duration_ms, error_kind, "operation_execution_failure");
    }
}
