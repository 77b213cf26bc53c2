//! Custom error types for the cleaning pipeline.
//!
//! Cell-level parse failures never surface here: they become nulls. The
//! variants below cover configuration problems, header collisions and the
//! file-level I/O failures the batch driver logs and skips.
//!
//! Errors are serializable so a batch report can carry them verbatim.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Two headers normalize to the same name and the collision policy rejects it.
    #[error("Columns '{first}' and '{second}' both normalize to '{normalized}'")]
    ColumnCollision {
        first: String,
        second: String,
        normalized: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input directory does not exist or cannot be listed.
    #[error("Input directory not found or unreadable: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// An input file could not be read as a table.
    #[error("Failed to read '{}': {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    /// A cleaned table could not be written.
    #[error("Failed to write '{}': {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },

    /// A cleaning stage failed on an otherwise readable table.
    #[error("Failed to clean data: {0}")]
    CleaningFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used in batch reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnCollision { .. } => "COLUMN_COLLISION",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::DirectoryNotFound { .. } => "DIRECTORY_NOT_FOUND",
            Self::ReadFailed { .. } => "READ_FAILED",
            Self::WriteFailed { .. } => "WRITE_FAILED",
            Self::CleaningFailed(_) => "CLEANING_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the batch driver should log this error and move on to the next file.
    ///
    /// Configuration and directory errors abort a batch: they would fail
    /// every file the same way.
    pub fn is_file_level(&self) -> bool {
        match self {
            Self::InvalidConfig(_) | Self::DirectoryNotFound { .. } => false,
            Self::WithContext { source, .. } => source.is_file_level(),
            _ => true,
        }
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
