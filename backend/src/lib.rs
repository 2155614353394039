//! # Joblist - job-listing normalization pipeline
//!
//! Joblist turns raw job-portal exports (free-text experience, lac salaries,
//! "5 days ago" dates, comma-packed locations and skills, labelled education
//! text) into a typed, analysis-ready table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Pipeline   │────▶│ Clean table │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │  (9 stages) │     │ (JSON/CSV)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use joblist::{clean_csv_file, CleanOptions, PipelineConfig};
//! use std::path::Path;
//!
//! fn main() {
//!     let result = clean_csv_file(Path::new("jobs.csv"), PipelineConfig::default(), CleanOptions::default()).unwrap();
//!     println!("Cleaned {} jobs", result.table.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Leveled pipeline logging
//! - [`models`] - Domain models (JobTable, JobId, CleanJob)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Field transformers, grouping, and pipeline
//! - [`export`] - JSON and CSV writers
//! - [`validation`] - Clean-row schema validation

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod export;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, CsvError, ExportError, PipelineError, TableError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{columns, CleanJob, JobId, JobTable, Record};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv_file_auto,
    parse_csv_str, ParseResult,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    clean_bytes, clean_csv_file, clean_table, CleanOptions, CleanResult, CsvInfo, DroppedRow,
    Pipeline, PipelineConfig, PipelineOutput, PipelineReport, Stage, StageStats,
};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{to_json_records, write_csv, write_json, write_to_path, ExportFormat};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid, is_valid_clean_job, validate, validate_clean_job};
