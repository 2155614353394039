//! Normalization pipeline: the fixed stage list, the runner and the
//! high-level load-clean-validate helpers.
//!
//! # Example
//!
//! ```rust,ignore
//! use joblist::transform::{clean_csv_file, CleanOptions, PipelineConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = clean_csv_file(
//!         Path::new("jobs.csv"),
//!         PipelineConfig::default(),
//!         CleanOptions::default(),
//!     )?;
//!
//!     println!("{}", result.report.summary());
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::broadcast;

use super::config::PipelineConfig;
use super::fields::{
    clean_location, clean_skill, parse_applications, parse_days_ago, parse_education,
    parse_experience, parse_rating, parse_salary, rating_mode, resolve_posted_date, round_rating,
    sanitize_company, EducationLevel, SalarySubstituter,
};
use super::grouper::expand_and_aggregate;
use crate::error::{ConfigResult, PipelineError, PipelineResult};
use crate::logs::{
    drain, log_error, log_info, log_info_indent, log_success, log_warning, log_warning_indent,
    LogEntry, LOG_BROADCASTER,
};
use crate::models::{cell_text, columns, dmy_date, JobId, JobTable};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult};
use crate::validation::validate_clean_job;

// =============================================================================
// Stages
// =============================================================================

/// One field transformer. [`Stage::ALL`] is the fixed run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Strip the boilerplate marker from `Company`
    Company,
    /// Round the rating, optionally impute the mode
    Rating,
    /// Split `Experience` into bounds, dropping rows that do not parse
    Experience,
    /// Convert `Salary` into a base-unit triple
    Salary,
    /// Resolve `Posted On` against the reference date
    Posted,
    /// Coerce `Applications` to a count
    Applications,
    /// Split and standardize `Education`
    Education,
    /// Explode and re-aggregate `Location`
    Location,
    /// Explode and re-aggregate `Key Skills`
    KeySkills,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::Company,
        Stage::Rating,
        Stage::Experience,
        Stage::Salary,
        Stage::Posted,
        Stage::Applications,
        Stage::Education,
        Stage::Location,
        Stage::KeySkills,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Company => "company",
            Stage::Rating => "rating",
            Stage::Experience => "experience",
            Stage::Salary => "salary",
            Stage::Posted => "posted",
            Stage::Applications => "applications",
            Stage::Education => "education",
            Stage::Location => "location",
            Stage::KeySkills => "key_skills",
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// A row removed by the experience filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRow {
    /// Position in the input table
    pub row: usize,
    pub job_id: Option<JobId>,
    pub reason: String,
    /// Raw cell that caused the drop
    pub value: Option<String>,
}

/// Per-stage counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageStats {
    /// Cells that produced a value
    pub parsed: usize,
    /// Cells that fell back to absent or a default
    pub missing: usize,
    /// Stage did not run
    pub skipped: bool,
}

/// What a run did to the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped: Vec<DroppedRow>,
    pub stages: BTreeMap<&'static str, StageStats>,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        format!(
            "Cleaned: {} of {} rows kept, {} dropped",
            self.rows_out,
            self.rows_in,
            self.dropped.len()
        )
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageStats> {
        self.stages.get(stage.name())
    }
}

/// Cleaned table plus its report.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: JobTable,
    pub report: PipelineReport,
}

// =============================================================================
// Runner
// =============================================================================

/// Configured stage runner.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    substituter: SalarySubstituter,
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Build a pipeline running every stage in order.
    pub fn new(config: PipelineConfig) -> ConfigResult<Self> {
        let substituter = SalarySubstituter::new(&config.salary_substitutions)?;
        Ok(Self { config, substituter, stages: Stage::ALL.to_vec() })
    }

    /// Restrict the run to `stages`. They still run in [`Stage::ALL`] order.
    pub fn with_stages(mut self, stages: &[Stage]) -> Self {
        self.stages = Stage::ALL.iter().copied().filter(|s| stages.contains(s)).collect();
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over the table in one forward pass.
    ///
    /// Fails only when a raw column is missing, before any row is touched.
    pub fn run(&self, mut table: JobTable) -> PipelineResult<PipelineOutput> {
        table.require_columns(&columns::RAW_COLUMNS)?;

        let mut report = PipelineReport { rows_in: table.len(), ..Default::default() };

        for stage in &self.stages {
            let stats = self.apply(*stage, &mut table, &mut report);
            log_info_indent(
                format!("{}: {} parsed, {} missing", stage.name(), stats.parsed, stats.missing),
                1,
            );
            report.stages.insert(stage.name(), stats);
        }

        report.rows_out = table.len();
        Ok(PipelineOutput { table, report })
    }

    fn apply(&self, stage: Stage, table: &mut JobTable, report: &mut PipelineReport) -> StageStats {
        match stage {
            Stage::Company => self.apply_company(table),
            Stage::Rating => self.apply_rating(table),
            Stage::Experience => self.apply_experience(table, report),
            Stage::Salary => self.apply_salary(table),
            Stage::Posted => self.apply_posted(table),
            Stage::Applications => self.apply_applications(table),
            Stage::Education => self.apply_education(table),
            Stage::Location => apply_list(table, columns::LOCATION, clean_location),
            Stage::KeySkills => apply_list(table, columns::KEY_SKILLS, clean_skill),
        }
    }

    fn apply_company(&self, table: &mut JobTable) -> StageStats {
        let mut stats = StageStats::default();
        for row in &mut table.rows {
            let raw = cell_text(row, columns::COMPANY);
            let value = match sanitize_company(raw.as_deref(), &self.config.company_marker) {
                Some(name) => {
                    stats.parsed += 1;
                    Value::String(name)
                }
                None => {
                    stats.missing += 1;
                    Value::Null
                }
            };
            row.insert(columns::COMPANY.to_string(), value);
        }
        stats
    }

    fn apply_rating(&self, table: &mut JobTable) -> StageStats {
        let column = self.config.rating_column.as_str();
        if !table.has_column(column) {
            log_warning(format!("No '{}' column, rating stage skipped", column));
            return StageStats { skipped: true, ..Default::default() };
        }

        let ratings: Vec<Option<f64>> = table
            .column(column)
            .map(|v| parse_rating(v).map(round_rating))
            .collect();

        let fill = if self.config.impute_rating_mode {
            let present: Vec<f64> = ratings.iter().flatten().copied().collect();
            rating_mode(&present)
        } else {
            None
        };

        let mut stats = StageStats::default();
        for (row, rating) in table.rows.iter_mut().zip(ratings) {
            let value = match rating.or(fill) {
                Some(r) => {
                    stats.parsed += 1;
                    Value::from(r)
                }
                None => {
                    stats.missing += 1;
                    Value::Null
                }
            };
            row.insert(column.to_string(), value);
        }
        stats
    }

    fn apply_experience(&self, table: &mut JobTable, report: &mut PipelineReport) -> StageStats {
        let mut stats = StageStats::default();
        let rows = std::mem::take(&mut table.rows);

        for (i, mut row) in rows.into_iter().enumerate() {
            let raw = cell_text(&row, columns::EXPERIENCE);
            let Some(range) = raw.as_deref().and_then(parse_experience) else {
                stats.missing += 1;
                report.dropped.push(DroppedRow {
                    row: i,
                    job_id: row.get(columns::JOB_ID).and_then(JobId::from_value),
                    reason: "unrecognized experience".to_string(),
                    value: raw,
                });
                continue;
            };

            if range.max != 0 && range.min > range.max {
                log_warning_indent(
                    format!("Row {}: reversed experience range '{}'", i, raw.unwrap_or_default()),
                    2,
                );
            }

            stats.parsed += 1;
            row.insert(columns::MIN_EXPERIENCE.to_string(), Value::from(range.min));
            row.insert(columns::MAX_EXPERIENCE.to_string(), Value::from(range.max));
            table.rows.push(row);
        }

        table.ensure_column(columns::MIN_EXPERIENCE);
        table.ensure_column(columns::MAX_EXPERIENCE);
        self.drop_raw(table, columns::EXPERIENCE);

        if !report.dropped.is_empty() {
            log_warning(format!("{} rows dropped (unrecognized experience)", report.dropped.len()));
        }
        stats
    }

    fn apply_salary(&self, table: &mut JobTable) -> StageStats {
        let mut stats = StageStats::default();
        for row in &mut table.rows {
            let parsed = cell_text(row, columns::SALARY)
                .map(|raw| self.substituter.apply(&raw))
                .and_then(|text| parse_salary(&text));

            let (min, max, average) = match parsed {
                Some(s) => {
                    stats.parsed += 1;
                    (Value::from(s.min), Value::from(s.max), Value::from(s.average))
                }
                None => {
                    stats.missing += 1;
                    (Value::Null, Value::Null, Value::Null)
                }
            };
            row.insert(columns::MIN_SALARY.to_string(), min);
            row.insert(columns::MAX_SALARY.to_string(), max);
            row.insert(columns::AVERAGE_SALARY.to_string(), average);
        }

        for col in [columns::MIN_SALARY, columns::MAX_SALARY, columns::AVERAGE_SALARY] {
            table.ensure_column(col);
        }
        self.drop_raw(table, columns::SALARY);
        stats
    }

    fn apply_posted(&self, table: &mut JobTable) -> StageStats {
        let mut stats = StageStats::default();
        let reference = self.config.reference_date;
        for (i, row) in table.rows.iter_mut().enumerate() {
            let parsed = cell_text(row, columns::POSTED_ON)
                .as_deref()
                .and_then(parse_days_ago)
                .and_then(|days| match resolve_posted_date(reference, days) {
                    Some(date) => Some((days, date)),
                    None => {
                        log_warning_indent(
                            format!("Row {}: '{} days ago' is out of date range, using 0", i, days),
                            2,
                        );
                        None
                    }
                });
            let (days, date) = match parsed {
                Some(resolved) => {
                    stats.parsed += 1;
                    resolved
                }
                None => {
                    stats.missing += 1;
                    (0, reference)
                }
            };
            row.insert(columns::DAYS_POSTED_ON.to_string(), Value::from(days));
            row.insert(columns::DATE_POSTED.to_string(), Value::String(dmy_date::format(&date)));
        }

        table.ensure_column(columns::DAYS_POSTED_ON);
        table.ensure_column(columns::DATE_POSTED);
        self.drop_raw(table, columns::POSTED_ON);
        stats
    }

    fn apply_applications(&self, table: &mut JobTable) -> StageStats {
        let mut stats = StageStats::default();
        for row in &mut table.rows {
            let value = match cell_text(row, columns::APPLICATIONS)
                .as_deref()
                .and_then(parse_applications)
            {
                Some(count) => {
                    stats.parsed += 1;
                    Value::from(count)
                }
                None => {
                    stats.missing += 1;
                    Value::Null
                }
            };
            row.insert(columns::APPLICATIONS.to_string(), value);
        }
        stats
    }

    fn apply_education(&self, table: &mut JobTable) -> StageStats {
        let mut stats = StageStats::default();
        for row in &mut table.rows {
            let levels = cell_text(row, columns::EDUCATION)
                .map(|text| parse_education(&text))
                .unwrap_or_default();

            for level in EducationLevel::ALL {
                let raw = levels.get(level);
                if raw.is_some() {
                    stats.parsed += 1;
                } else {
                    stats.missing += 1;
                }
                let tag = self.config.education.standardize(level, raw);
                row.insert(level.column().to_string(), Value::String(tag));
            }
        }

        for level in EducationLevel::ALL {
            table.ensure_column(level.column());
        }
        self.drop_raw(table, columns::EDUCATION);
        stats
    }

    fn drop_raw(&self, table: &mut JobTable, column: &str) {
        if !self.config.keep_raw_columns {
            table.drop_column(column);
        }
    }
}

fn apply_list(table: &mut JobTable, column: &str, clean: fn(&str) -> String) -> StageStats {
    let missing = table.column(column).filter(|v| v.is_null()).count();
    let parsed = expand_and_aggregate(table, column, clean);
    StageStats { parsed, missing, skipped: false }
}

// =============================================================================
// High-level API
// =============================================================================

/// Options for the load-clean-validate helpers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanOptions {
    /// Skip the schema check of cleaned rows
    pub skip_validation: bool,
}

/// CSV file information.
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of [`clean_csv_file`], [`clean_bytes`] or [`clean_table`].
#[derive(Debug, Clone)]
pub struct CleanResult {
    pub table: JobTable,
    pub report: PipelineReport,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// (row index, errors), first ten invalid rows only
    pub validation_errors: Vec<(usize, Vec<String>)>,
    /// Present when the table came from CSV
    pub csv_info: Option<CsvInfo>,
    /// Log lines emitted while this run was in progress
    pub log: Vec<LogEntry>,
}

/// Load a CSV export, clean it and check the output rows.
pub fn clean_csv_file(
    path: &Path,
    config: PipelineConfig,
    options: CleanOptions,
) -> PipelineResult<CleanResult> {
    let mut rx = LOG_BROADCASTER.subscribe();
    log_info(format!("Reading {}...", path.display()));
    let result = parse_csv_file_auto(path)
        .map_err(PipelineError::from)
        .and_then(|parsed| clean_parsed(parsed, config, options));
    with_log(result, &mut rx)
}

/// Same as [`clean_csv_file`] for raw bytes.
pub fn clean_bytes(
    bytes: &[u8],
    config: PipelineConfig,
    options: CleanOptions,
) -> PipelineResult<CleanResult> {
    let mut rx = LOG_BROADCASTER.subscribe();
    let result = parse_bytes_auto(bytes)
        .map_err(PipelineError::from)
        .and_then(|parsed| clean_parsed(parsed, config, options));
    with_log(result, &mut rx)
}

/// Clean an in-memory table and check the output rows.
pub fn clean_table(
    table: JobTable,
    config: PipelineConfig,
    options: CleanOptions,
) -> PipelineResult<CleanResult> {
    let mut rx = LOG_BROADCASTER.subscribe();
    with_log(run_clean(table, config, options), &mut rx)
}

/// Attach everything logged since `rx` subscribed.
///
/// Other threads logging at the same time show up here too.
fn with_log(
    result: PipelineResult<CleanResult>,
    rx: &mut broadcast::Receiver<LogEntry>,
) -> PipelineResult<CleanResult> {
    let mut result = result?;
    result.log = drain(rx);
    Ok(result)
}

fn clean_parsed(
    parsed: ParseResult,
    config: PipelineConfig,
    options: CleanOptions,
) -> PipelineResult<CleanResult> {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} rows", parsed.table.len()));

    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.table.headers.clone(),
        row_count: parsed.table.len(),
    };

    let mut result = run_clean(parsed.table, config, options)?;
    result.csv_info = Some(csv_info);
    Ok(result)
}

fn run_clean(
    table: JobTable,
    config: PipelineConfig,
    options: CleanOptions,
) -> PipelineResult<CleanResult> {
    if table.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    log_info(format!("Cleaning {} rows (reference date {})...", table.len(), dmy_date::format(&config.reference_date)));
    let output = Pipeline::new(config)?.run(table)?;
    log_success(output.report.summary());

    let (valid_count, invalid_count, validation_errors) = if options.skip_validation {
        log_info("(validation skipped)");
        (output.table.len(), 0, vec![])
    } else {
        let result = validate_rows(&output.table);
        print_validation_result(&result);
        result
    };

    Ok(CleanResult {
        table: output.table,
        report: output.report,
        valid_count,
        invalid_count,
        validation_errors,
        csv_info: None,
        log: Vec::new(),
    })
}

/// Validate cleaned rows and return (valid, invalid, first errors).
fn validate_rows(table: &JobTable) -> (usize, usize, Vec<(usize, Vec<String>)>) {
    let mut valid = 0;
    let mut invalid = 0;
    let mut errors = Vec::new();

    for (i, record) in table.to_json_records().iter().enumerate() {
        match validate_clean_job(record) {
            Ok(()) => valid += 1,
            Err(errs) => {
                invalid += 1;
                if errors.len() < 10 {
                    errors.push((i, errs));
                }
            }
        }
    }

    (valid, invalid, errors)
}

fn print_validation_result(result: &(usize, usize, Vec<(usize, Vec<String>)>)) {
    if result.1 == 0 {
        log_success(format!("All {} records valid!", result.0));
    } else {
        log_success(format!("Valid: {}", result.0));
        log_error(format!("Invalid: {}", result.1));
        for (row, errs) in result.2.iter().take(3) {
            log_error(format!("Row {}: {}", row, errs.join(", ")));
        }
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}
