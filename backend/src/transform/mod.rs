//! Transformation module.
//!
//! - Config: reference date, substitution table, education vocabulary
//! - Fields: per-column parsers and cleaners
//! - Grouper: explode / group by job / merge back for multi-valued columns
//! - Pipeline: fixed stage order, runner and report

pub mod config;
pub mod fields;
pub mod grouper;
pub mod pipeline;

pub use config::{parse_reference_date, PipelineConfig, DEFAULT_REFERENCE_DATE, REFERENCE_DATE_ENV};
pub use grouper::expand_and_aggregate;
pub use pipeline::*;
