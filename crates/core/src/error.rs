//! Error types for contribution calculation, configuration, and export.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the calculator and the deck surfaces.
///
/// Out-of-range navigation has no variant: the navigator ignores it.
#[derive(Error, Debug)]
pub enum Error {
    /// A salary or amount was negative, non-finite, or could not be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A contribution configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The document exporter failed. No partial file is left behind.
    #[error("Export failed: {0}")]
    ExportFailure(String),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
