//! Logging setup
//!
//! stderr always; a daily rolling file as well when a log directory is set.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::domain::config::LogConfig;

const LOG_FILE_PREFIX: &str = "pv-console.log";

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. Keep the returned guard alive
/// for the life of the process or buffered file output is lost.
pub fn init_tracing(config: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::rfc_3339());

    match config.directory.as_deref().filter(|d| !d.is_empty()) {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_timer(LocalTime::rfc_3339())
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr).init();
            None
        }
    }
}
