//! Error types for the catalog cleaning pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - Reading and parsing the source CSV
//! - [`ColumnError`] - Header normalization conflicts
//! - [`PipelineError`] - Top-level errors of one cleaning run
//! - [`WatchError`] - Directory watcher setup and archiving
//! - [`ServerError`] - HTTP layer errors
//!
//! Cell-level problems (unparsable numbers, unknown booleans, a missing id
//! column) are never errors: they degrade to nulls or fallbacks and only show
//! up in the report.
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading the source table.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the source.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Source bytes are not valid UTF-8.
    #[error("Input is not valid UTF-8: {0}")]
    Encoding(String),

    /// Malformed delimited data.
    #[error("Invalid CSV format at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// No header row.
    #[error("CSV file is empty")]
    EmptyFile,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CsvError::Io(io),
            csv::ErrorKind::Utf8 { .. } => CsvError::Encoding(message),
            _ => CsvError::Parse { line, message },
        }
    }
}

// =============================================================================
// Column Errors
// =============================================================================

/// Errors during header normalization.
#[derive(Debug, Error, PartialEq)]
pub enum ColumnError {
    /// Two raw headers collapse onto one canonical name.
    #[error("Columns '{first}' and '{second}' both normalize to '{name}'")]
    Collision {
        name: String,
        first: String,
        second: String,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::process_csv`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input path does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Source parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Header normalization error.
    #[error("Column error: {0}")]
    Column(#[from] ColumnError),

    /// Failed to write the cleaned table.
    #[error("Failed to write output: {0}")]
    Write(#[from] csv::Error),

    /// Output path or directory error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Watch Errors
// =============================================================================

/// Directory watcher errors.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Input directory is missing.
    #[error("Input directory not found: {}", .0.display())]
    MissingInputDir(PathBuf),

    /// Directory could not be created or scanned.
    #[error("Directory error on '{}': {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Processed file could not be moved into the archive.
    #[error("Failed to archive '{}': {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pipeline failure for one file.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Failed to package results.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for watcher operations.
pub type WatchResult<T> = Result<T, WatchError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
