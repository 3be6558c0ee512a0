//! Installs the tracing subscriber used by the binaries.

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer,
    filter::{self, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Send log events to stderr, and optionally to a debug log file.
///
/// Stderr shows events at `default_level` and above unless `RUST_LOG` says
/// otherwise. The debug log, if given, records everything at DEBUG and above
/// and is appended to.
///
/// # Errors
/// Returns an IO error if the debug log file cannot be opened.
pub fn setup_logging(
    default_level: LevelFilter,
    debug_log_path: Option<&Path>,
) -> std::io::Result<()> {
    let stderr_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let debug_log = match debug_log_path {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}
