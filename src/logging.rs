//! File logging setup.
//!
//! The terminal belongs to the prompt, so log records go to a daily-rolling
//! file under the configured log directory.

use crate::error::{AppError, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "quiz-cli";
const LOG_FILE_SUFFIX: &str = "log";

/// Opens the rolling log file in `log_dir`, creating the directory if needed.
///
/// # Errors
///
/// Returns `AppError::Logging` if the directory cannot be created or the
/// file cannot be opened, for example when `log_dir` names a regular file.
pub fn file_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(log_dir)
        .map_err(AppError::from)
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered records get flushed.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(file_appender(log_dir)?);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_log_directory() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("nested").join("logs");

        assert!(file_appender(&log_dir).is_ok());
        assert!(log_dir.is_dir());
    }

    #[test]
    fn log_dir_that_is_a_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("notadir");
        std::fs::write(&not_a_dir, "plain file").unwrap();

        let err = file_appender(&not_a_dir).unwrap_err();
        assert!(matches!(err, AppError::Logging(_)));
        assert!(err.to_string().starts_with("Logging Error"));
    }
}
