//! Pipeline configuration.
//!
//! Everything the stages need that is not in the table itself: the
//! reference date for relative dates, the salary substitution table, the
//! education vocabulary and a few toggles. Every field has a default, so a
//! config file only lists what it overrides:
//!
//! ```json
//! {
//!   "reference_date": "01-10-2024",
//!   "impute_rating_mode": true,
//!   "salary_substitutions": [{ "from": "45,000", "to": "0.45" }]
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::dmy_date;
use crate::transform::fields::{EducationVocabulary, SalarySubstitution};

/// Environment variable overriding the reference date.
pub const REFERENCE_DATE_ENV: &str = "JOBLIST_REFERENCE_DATE";

/// Reference date of the dataset snapshot, `DD-MM-YYYY`.
pub const DEFAULT_REFERENCE_DATE: &str = "10-09-2024";

/// Boilerplate prefix some listings put in front of the company name.
pub const DEFAULT_COMPANY_MARKER: &str = "Hiring for";

/// Rating column name. Not one of the required raw columns: exports without
/// it skip the rating stage.
pub const DEFAULT_RATING_COLUMN: &str = "Ratings";

/// Configuration passed into [`crate::transform::Pipeline::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// "N days ago" is resolved against this date
    #[serde(with = "dmy_date")]
    pub reference_date: NaiveDate,

    /// Removed verbatim from `Company`
    pub company_marker: String,

    /// Column holding the numeric rating.
    ///
    /// The raw export does not always carry ratings, so this column is not
    /// required. When the table lacks it the rating stage is skipped with a
    /// warning and `impute_rating_mode` has no effect.
    pub rating_column: String,

    /// Fill missing ratings with the most frequent rounded rating
    pub impute_rating_mode: bool,

    /// Applied to `Salary` before parsing, in order
    pub salary_substitutions: Vec<SalarySubstitution>,

    /// Education rule tables
    pub education: EducationVocabulary,

    /// Keep `Experience`, `Salary`, `Posted On` and `Education` next to
    /// their derived columns
    pub keep_raw_columns: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
            company_marker: DEFAULT_COMPANY_MARKER.to_string(),
            rating_column: DEFAULT_RATING_COLUMN.to_string(),
            impute_rating_mode: false,
            salary_substitutions: SalarySubstitution::defaults(),
            education: EducationVocabulary::default(),
            keep_raw_columns: false,
        }
    }
}

fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 10).unwrap_or_default()
}

impl PipelineConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the reference date from `DD-MM-YYYY` text.
    pub fn with_reference_date_str(mut self, text: &str) -> ConfigResult<Self> {
        self.reference_date = parse_reference_date(text)?;
        Ok(self)
    }

    /// Apply `JOBLIST_REFERENCE_DATE` if it is set (`.env` included).
    pub fn apply_env(self) -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        match std::env::var(REFERENCE_DATE_ENV) {
            Ok(value) if !value.trim().is_empty() => self.with_reference_date_str(&value),
            _ => Ok(self),
        }
    }
}

/// Parse a `DD-MM-YYYY` reference date.
pub fn parse_reference_date(text: &str) -> ConfigResult<NaiveDate> {
    dmy_date::parse(text).ok_or_else(|| ConfigError::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::fields::EducationLevel;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(dmy_date::format(&config.reference_date), DEFAULT_REFERENCE_DATE);
        assert_eq!(config.company_marker, "Hiring for");
        assert!(!config.impute_rating_mode);
        assert!(!config.keep_raw_columns);
        assert_eq!(config.salary_substitutions.len(), 3);
    }

    #[test]
    fn test_rating_column_is_optional() {
        let config = PipelineConfig::default();
        assert_eq!(config.rating_column, "Ratings");
        assert!(!crate::models::columns::RAW_COLUMNS.contains(&config.rating_column.as_str()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json(
            r#"{ "reference_date": "01-10-2024", "impute_rating_mode": true }"#,
        )
        .unwrap();

        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
        assert!(config.impute_rating_mode);
        assert_eq!(config.salary_substitutions, SalarySubstitution::defaults());
        assert_eq!(config.education, EducationVocabulary::default());
    }

    #[test]
    fn test_custom_vocabulary_from_json() {
        let config = PipelineConfig::from_json(
            r#"{
                "education": {
                    "ug": [{ "patterns": ["llb"], "tag": "LLB" }],
                    "pg": [],
                    "doctorate": []
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.education.standardize(EducationLevel::Ug, Some("llb")), "LLB");
        assert_eq!(
            config.education.standardize(EducationLevel::Pg, Some("mba")),
            "Not Specified"
        );
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let err = PipelineConfig::from_json(r#"{ "reference_date": "2024-09-10" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::JsonError(_)));

        let err = PipelineConfig::default().with_reference_date_str("31-02-2024").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDate(_)));
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("joblist.json");
        let config = PipelineConfig::default().with_reference_date_str("15-08-2024").unwrap();
        std::fs::write(&path, config.to_json().unwrap()).unwrap();

        let loaded = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
