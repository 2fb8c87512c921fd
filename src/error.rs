//! Error handling for trellis.
//! Defines the error taxonomy and result type used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for trellis operations.
///
/// Scanning and validation failures surface to the immediate caller. File system
/// errors are never translated: they are wrapped as-is and propagated.
#[derive(Error, Debug)]
pub enum TrellisError {
    /// Permission denied, disk full, a path segment that exists as a non-directory, ...
    #[error("File system error: {0}.")]
    FileSystemError(#[from] io::Error),

    /// Every candidate directory and the recursive fallback were exhausted
    #[error("Configuration file couldn't be loaded! Scanned paths: {}", display_paths(.scanned))]
    ConfigNotFound { scanned: Vec<PathBuf> },

    /// A configuration file was found but could not be parsed
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Aggregates every violated-rule message for a single field
    #[error("{}", .messages.join("\n"))]
    ValidationError { field: String, messages: Vec<String> },

    /// Requested database/storage adapter is not registered
    #[error("Adapter {0} is not supported")]
    UnsupportedAdapterError(String),

    /// An option key or value does not fit the option schema
    #[error("Option error: {0}.")]
    OptionError(String),

    /// Template files are missing or malformed
    #[error("Template error: {0}.")]
    TemplateError(String),
}

/// Convenience type alias for Results with TrellisError as the error type.
pub type TrellisResult<T> = Result<T, TrellisError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

/// Category of a [`TrellisError`], as carried by an [`ErrorReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileSystem,
    ConfigNotFound,
    Config,
    Validation,
    UnsupportedAdapter,
    Option,
    Template,
}

/// Immutable summary of an error, suitable for presenting to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    /// First path involved in the failure, when there is one.
    pub path: Option<PathBuf>,
}

impl From<&TrellisError> for ErrorReport {
    fn from(err: &TrellisError) -> Self {
        let (kind, path) = match err {
            TrellisError::FileSystemError(_) => (ErrorKind::FileSystem, None),
            TrellisError::ConfigNotFound { scanned } => {
                (ErrorKind::ConfigNotFound, scanned.first().cloned())
            }
            TrellisError::ConfigError(_) => (ErrorKind::Config, None),
            TrellisError::ValidationError { .. } => (ErrorKind::Validation, None),
            TrellisError::UnsupportedAdapterError(_) => (ErrorKind::UnsupportedAdapter, None),
            TrellisError::OptionError(_) => (ErrorKind::Option, None),
            TrellisError::TemplateError(_) => (ErrorKind::Template, None),
        };
        Self { kind, message: err.to_string(), path }
    }
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The TrellisError to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: TrellisError) {
    let report = ErrorReport::from(&err);
    log::debug!("{:?}", report.kind);
    eprintln!("{}", report.message);
    std::process::exit(1);
}
