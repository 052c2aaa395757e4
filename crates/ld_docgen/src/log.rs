//! Logging bootstrap.
//!
//! The log level is controlled through the `RUST_LOG` environment variable
//! and defaults to `info`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::DocgenError;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging to a `docgen.log` file inside `directory`.
///
/// The returned guard owns the background writer; dropping it flushes
/// buffered log lines, so keep it alive for the program's lifetime.
pub fn init_file_logging(directory: &Path) -> Result<WorkerGuard, DocgenError> {
    std::fs::create_dir_all(directory).map_err(|source| DocgenError::CreateDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(directory, "docgen.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|_| DocgenError::Logging)?;

    Ok(guard)
}

/// Initializes logging to stderr.
pub fn init_stderr_logging() -> Result<(), DocgenError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| DocgenError::Logging)
}
