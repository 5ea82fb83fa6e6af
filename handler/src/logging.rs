use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directory daily log files are written to.
pub const LOG_DIR: &str = "logs";

/// Filter used when `log_level` is not a valid filter directive.
const FALLBACK_FILTER: &str = "handler=info";

/// Installs the global subscriber: a daily rolling file under [`LOG_DIR`],
/// plus stdout when `log_to_stdout` is set.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// stops the background file writer.
pub fn init_logging(log_file: &str, log_level: &str, log_to_stdout: bool) -> WorkerGuard {
    fs::create_dir_all(LOG_DIR).ok();

    let file_appender = rolling::daily(LOG_DIR, log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}
