//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// No quiz exists at the requested index. Carries the index exactly as the caller gave it.
    #[error("There is no quiz at index {0}")]
    NotFound(String),

    /// Error reading or writing the quiz file as JSON (`serde_json`).
    #[error("JSON Parsing Error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// Error related to accessing environment variables.
    #[error("Environment Error: {0}")]
    Env(#[from] std::env::VarError),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Error specific to command parsing or argument handling.
    #[error("{0}")]
    Cli(String),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// The log file appender could not be set up (`tracing-appender`).
    #[error("Logging Error: {0}")]
    Logging(Arc<tracing_appender::rolling::InitError>),
}

impl AppError {
    /// Shorthand for a `NotFound` built from a resolved index.
    pub fn not_found(index: usize) -> Self {
        AppError::NotFound(index.to_string())
    }

    /// Whether this error only means the user closed the input (EOF or Ctrl+C).
    pub fn is_end_of_input(&self) -> bool {
        use std::io::ErrorKind;

        let io = match self {
            AppError::Io(io) => io.as_ref(),
            AppError::Dialoguer(err) => match err.as_ref() {
                dialoguer::Error::IO(io) => io,
                #[allow(unreachable_patterns)]
                _ => return false,
            },
            _ => return false,
        };
        matches!(io.kind(), ErrorKind::UnexpectedEof | ErrorKind::Interrupted)
    }
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<tracing_appender::rolling::InitError> for AppError {
    fn from(err: tracing_appender::rolling::InitError) -> Self {
        AppError::Logging(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParse(Arc::new(err))
    }
}
