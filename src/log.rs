//! Log sink passed to the profile, and tracing setup for the CLI.

use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Where the profile sends warnings and errors it cannot hand to a caller.
///
/// Implementations must never fail.
pub trait LogSink: Send + Sync {
    fn log_warning(&self, message: &str);

    fn log_error(&self, message: &str, cause: &dyn Error);

    /// Report an error the user should see (e.g. corrupt saved settings).
    fn show_user_error(&self, message: &str, cause: &dyn Error);
}

/// Default sink backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn log_warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn log_error(&self, message: &str, cause: &dyn Error) {
        tracing::error!(cause = %cause, "{}", message);
    }

    fn show_user_error(&self, message: &str, cause: &dyn Error) {
        tracing::error!(cause = %cause, "{}", message);
        eprintln!("Error: {}: {}", message, cause);
    }
}

/// Install the global subscriber.
///
/// Respects `CHECKPROFILE_LOG`; defaults to `warn`, or `debug` when verbose.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("CHECKPROFILE_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    // A host may already have installed one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
