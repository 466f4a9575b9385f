//! Error types for the conversion pipeline.
//!
//! `ConversionError` covers the fatal failures that stop a conversion before
//! an artifact is written. `PostActionError` covers the best-effort actions
//! that run after a successful write; those never invalidate the artifact.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error raised by a `DocumentConverter` implementation.
pub type ConverterError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal errors that abort a single conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The input path is missing or is not a regular file.
    #[error("Input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// The input file could not be read as text.
    #[error("Failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A project config or style file exists but cannot be used: bad JSON,
    /// or a value of the wrong shape.
    #[error("Invalid config in {}: {message}", .path.display())]
    ConfigParseError { path: PathBuf, message: String },

    /// The document converter rejected the input.
    #[error("Conversion failed: {source}")]
    ConversionFailed {
        #[source]
        source: ConverterError,
    },

    /// The artifact could not be written to its resolved path.
    #[error("Failed to write {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConversionError {
    /// Short label of the phase that failed, used in status lines.
    pub fn phase(&self) -> &'static str {
        match self {
            ConversionError::InputNotFound { .. } => "validating",
            ConversionError::ReadError { .. } => "reading",
            ConversionError::ConfigParseError { .. } => "preparing options",
            ConversionError::ConversionFailed { .. } => "converting",
            ConversionError::WriteError { .. } => "writing",
        }
    }
}

/// Non-fatal failures of the actions that follow a successful write.
#[derive(Debug, Error)]
pub enum PostActionError {
    /// The file watcher could not be installed; watch mode stays off.
    #[error("Could not watch {}: {message}", .path.display())]
    WatchInstallFailed { path: PathBuf, message: String },

    /// The OS refused to open the produced document.
    #[error("Could not open {}: {message}", .path.display())]
    OpenActionFailed { path: PathBuf, message: String },
}
