//! Structured logging bootstrap (`spec.md` §10.1), grounded on `ox-bin`'s
//! `configure_logging`: a non-blocking rolling file appender plus an
//! env-filter, initialized once and torn down via the returned
//! [`WorkerGuard`].

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

/// Initializes the global `tracing` subscriber, writing to `<log_dir>/gpg.log`.
/// Returns the [`WorkerGuard`] the caller must hold for the process
/// lifetime; dropping it flushes and stops the background writer thread.
/// A subscriber already being installed (e.g. in tests) is not an error —
/// the guard is simply `None`.
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(log_dir, "gpg.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_) => None,
    }
}
