//! Error types for the job-listing normalization pipeline.
//!
//! - [`CsvError`] - loading the raw export into a table
//! - [`TableError`] - structurally wrong input tables
//! - [`ConfigError`] - pipeline configuration problems
//! - [`ExportError`] - writing the cleaned table out
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Row-level problems (bad salary text, unknown education, ...) are never
//! errors: they become absent cells or dropped rows and show up in the
//! [`crate::transform::PipelineReport`] instead.
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Loading Errors
// =============================================================================

/// Errors while loading a raw CSV export.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the raw bytes.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Table Errors
// =============================================================================

/// Errors about the shape of the input table.
#[derive(Debug, Error)]
pub enum TableError {
    /// One or more raw columns the pipeline reads are missing.
    #[error("Input table is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A row is not a JSON object.
    #[error("Row {0} is not an object")]
    NotAnObject(usize),

    /// A cleaned row does not fit the typed record.
    #[error("Row {row} cannot be read as a cleaned job: {message}")]
    InvalidRecord { row: usize, message: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building a [`crate::transform::PipelineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Cannot read config: {0}")]
    IoError(#[from] std::io::Error),

    /// Config JSON is malformed.
    #[error("Invalid config JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Reference date is not `DD-MM-YYYY`.
    #[error("Invalid reference date '{0}' (expected DD-MM-YYYY)")]
    InvalidDate(String),

    /// A regex built from configuration failed to compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the cleaned table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writer failed.
    #[error("Write failed: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV encoder failed.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoder failed.
    #[error("JSON write failed: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::Pipeline::run`]
/// and the loading helpers in [`crate::transform::pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV loading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Input table error.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// No rows to clean.
    #[error("No records to clean")]
    EmptyInput,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV loading.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for exports.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
