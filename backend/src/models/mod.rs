//! Domain models for the job-listing pipeline.
//!
//! - [`JobTable`] - the in-memory table every stage reads and writes
//! - [`columns`] - raw and derived column names
//! - [`JobId`] - row identity, text or integer
//! - [`CleanJob`] - typed view of one cleaned row

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{TableError, TableResult};

/// One row: column name to cell. Absent cells are `Value::Null`.
pub type Record = Map<String, Value>;

static NULL: Value = Value::Null;

// =============================================================================
// Column Names
// =============================================================================

/// Column names of the raw export and of the derived output.
pub mod columns {
    pub const JOB_ID: &str = "Job ID";
    pub const JOB_TITLE: &str = "Job Title";
    pub const COMPANY: &str = "Company";
    pub const REVIEWS: &str = "Reviews";
    pub const LOCATION: &str = "Location";
    pub const EXPERIENCE: &str = "Experience";
    pub const SALARY: &str = "Salary";
    pub const POSTED_ON: &str = "Posted On";
    pub const OPENINGS: &str = "Openings";
    pub const APPLICATIONS: &str = "Applications";
    pub const JOB_DESCRIPTION: &str = "Job Description";
    pub const ROLE: &str = "Role";
    pub const INDUSTRY_TYPE: &str = "Industry Type";
    pub const DEPARTMENT: &str = "Department";
    pub const EMPLOYMENT_TYPE: &str = "Employment Type";
    pub const ROLE_CATEGORY: &str = "Role Category";
    pub const EDUCATION: &str = "Education";
    pub const KEY_SKILLS: &str = "Key Skills";

    pub const MIN_EXPERIENCE: &str = "Min_Experience";
    pub const MAX_EXPERIENCE: &str = "Max_Experience";
    pub const MIN_SALARY: &str = "Min_Salary";
    pub const MAX_SALARY: &str = "Max_Salary";
    pub const AVERAGE_SALARY: &str = "Average_Salary";
    pub const DAYS_POSTED_ON: &str = "Days Posted On";
    pub const DATE_POSTED: &str = "Date Posted";
    pub const UG: &str = "UG";
    pub const PG: &str = "PG";
    pub const DOCTORATE: &str = "Doctorate";

    /// Every column the loader must supply.
    pub const RAW_COLUMNS: [&str; 18] = [
        JOB_ID,
        JOB_TITLE,
        COMPANY,
        REVIEWS,
        LOCATION,
        EXPERIENCE,
        SALARY,
        POSTED_ON,
        OPENINGS,
        APPLICATIONS,
        JOB_DESCRIPTION,
        ROLE,
        INDUSTRY_TYPE,
        DEPARTMENT,
        EMPLOYMENT_TYPE,
        ROLE_CATEGORY,
        EDUCATION,
        KEY_SKILLS,
    ];
}

// =============================================================================
// Cell Helpers
// =============================================================================

/// Read a cell as text. Numbers and booleans are rendered, null is `None`.
pub fn cell_text(row: &Record, column: &str) -> Option<String> {
    row.get(column).and_then(value_text)
}

/// Render a scalar value as text.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// =============================================================================
// Job Identifier
// =============================================================================

/// Stable row identity. Exports carry it either as text or as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(i64),
    Text(String),
}

impl JobId {
    /// Read the identifier of a row, if the cell holds one.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(JobId::Number),
            Value::String(s) if !s.trim().is_empty() => Some(JobId::Text(s.trim().to_string())),
            _ => None,
        }
    }

    /// Grouping key shared by both representations.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(n) => write!(f, "{}", n),
            JobId::Text(s) => write!(f, "{}", s),
        }
    }
}

// =============================================================================
// Job Table
// =============================================================================

/// In-memory table: ordered headers plus one object per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTable {
    /// Column names in display order
    pub headers: Vec<String>,
    /// Rows keyed by column name
    pub rows: Vec<Record>,
}

impl JobTable {
    /// Create an empty table with the given columns.
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Build a table from JSON objects, collecting headers in first-seen order.
    pub fn from_records(records: Vec<Value>) -> TableResult<Self> {
        let mut table = Self::default();
        for (i, record) in records.into_iter().enumerate() {
            match record {
                Value::Object(obj) => {
                    for key in obj.keys() {
                        table.ensure_column(key);
                    }
                    table.rows.push(obj);
                }
                _ => return Err(TableError::NotAnObject(i)),
            }
        }
        table.fill_missing_cells();
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Fail with every missing column listed.
    pub fn require_columns(&self, required: &[&str]) -> TableResult<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|col| !self.has_column(col))
            .map(|col| col.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TableError::MissingColumns(missing))
        }
    }

    /// Append a header if not yet present. Existing rows get a null cell.
    pub fn ensure_column(&mut self, name: &str) {
        if self.has_column(name) {
            return;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.entry(name.to_string()).or_insert(Value::Null);
        }
    }

    /// Remove a column from the headers and from every row.
    pub fn drop_column(&mut self, name: &str) {
        self.headers.retain(|h| h != name);
        for row in &mut self.rows {
            row.remove(name);
        }
    }

    /// Add a row, padding absent columns with null.
    pub fn push_row(&mut self, mut row: Record) {
        for key in row.keys().cloned().collect::<Vec<_>>() {
            if !self.has_column(&key) {
                self.ensure_column(&key);
            }
        }
        for header in &self.headers {
            row.entry(header.clone()).or_insert(Value::Null);
        }
        self.rows.push(row);
    }

    /// Cells of one column, null where a row lacks the key.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| row.get(name).unwrap_or(&NULL))
    }

    /// Convert every row into a typed [`CleanJob`].
    pub fn to_clean_jobs(&self) -> TableResult<Vec<CleanJob>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                serde_json::from_value(Value::Object(row.clone())).map_err(|e| {
                    TableError::InvalidRecord { row: i, message: e.to_string() }
                })
            })
            .collect()
    }

    /// Rows as JSON objects.
    pub fn to_json_records(&self) -> Vec<Value> {
        self.rows.iter().cloned().map(Value::Object).collect()
    }

    fn fill_missing_cells(&mut self) {
        for row in &mut self.rows {
            for header in &self.headers {
                row.entry(header.clone()).or_insert(Value::Null);
            }
        }
    }
}

// =============================================================================
// Clean Job (typed output)
// =============================================================================

/// One cleaned job listing.
///
/// Columns the pipeline passes through untouched (description, role,
/// industry, ...) are kept in `other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanJob {
    #[serde(rename = "Job ID")]
    pub job_id: JobId,

    #[serde(rename = "Job Title", default)]
    pub job_title: Option<String>,

    #[serde(rename = "Company", default)]
    pub company: Option<String>,

    #[serde(rename = "Min_Experience")]
    pub min_experience: u32,

    /// `0` when the listing gave a single value.
    #[serde(rename = "Max_Experience")]
    pub max_experience: u32,

    #[serde(rename = "Min_Salary", default)]
    pub min_salary: Option<f64>,

    #[serde(rename = "Max_Salary", default)]
    pub max_salary: Option<f64>,

    #[serde(rename = "Average_Salary", default)]
    pub average_salary: Option<f64>,

    #[serde(rename = "Days Posted On")]
    pub days_posted_on: u32,

    #[serde(rename = "Date Posted", with = "dmy_date")]
    pub date_posted: NaiveDate,

    #[serde(rename = "Applications", default)]
    pub applications: Option<u32>,

    #[serde(rename = "UG")]
    pub ug: String,

    #[serde(rename = "PG")]
    pub pg: String,

    #[serde(rename = "Doctorate")]
    pub doctorate: String,

    #[serde(rename = "Location", default)]
    pub location: Vec<String>,

    #[serde(rename = "Key Skills", default)]
    pub key_skills: Vec<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl CleanJob {
    /// Whether the listing disclosed a usable salary.
    pub fn has_salary(&self) -> bool {
        self.average_salary.is_some()
    }
}

/// `DD-MM-YYYY` dates, the format `Date Posted` is written in.
pub mod dmy_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d-%m-%Y";

    pub fn format(date: &NaiveDate) -> String {
        date.format(FORMAT).to_string()
    }

    pub fn parse(text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid date '{}', expected DD-MM-YYYY", text))
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_records_collects_headers() {
        let table = JobTable::from_records(vec![
            json!({ "Job ID": 1, "Company": "Acme" }),
            json!({ "Job ID": 2, "Salary": "3 Lacs" }),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column("Salary"));
        // Missing cells are padded with null
        assert_eq!(table.rows[0]["Salary"], Value::Null);
        assert_eq!(table.rows[1]["Company"], Value::Null);
    }

    #[test]
    fn test_from_records_rejects_non_objects() {
        let err = JobTable::from_records(vec![json!({ "Job ID": 1 }), json!("oops")]).unwrap_err();
        assert!(matches!(err, TableError::NotAnObject(1)));
    }

    #[test]
    fn test_require_columns_lists_all_missing() {
        let table = JobTable::new(vec!["Job ID".into(), "Salary".into()]);
        let err = table.require_columns(&["Job ID", "Education", "Key Skills"]).unwrap_err();
        match err {
            TableError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["Education".to_string(), "Key Skills".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_drop_and_ensure_column() {
        let mut table = JobTable::from_records(vec![json!({ "Job ID": "a", "Salary": "x" })]).unwrap();
        table.drop_column("Salary");
        assert!(!table.has_column("Salary"));
        assert!(table.rows[0].get("Salary").is_none());

        table.ensure_column("Min_Salary");
        assert_eq!(table.headers.last().unwrap(), "Min_Salary");
        assert_eq!(table.rows[0]["Min_Salary"], Value::Null);
    }

    #[test]
    fn test_job_id_representations() {
        assert_eq!(JobId::from_value(&json!(42)), Some(JobId::Number(42)));
        assert_eq!(JobId::from_value(&json!(" j-7 ")), Some(JobId::Text("j-7".into())));
        assert_eq!(JobId::from_value(&json!("")), None);
        assert_eq!(JobId::Number(42).key(), "42");
    }

    #[test]
    fn test_clean_job_deserialization() {
        let row = json!({
            "Job ID": 7,
            "Job Title": "Data Analyst",
            "Company": "Acme",
            "Min_Experience": 2,
            "Max_Experience": 5,
            "Min_Salary": 300000.0,
            "Max_Salary": 500000.0,
            "Average_Salary": 400000.0,
            "Days Posted On": 5,
            "Date Posted": "05-09-2024",
            "Applications": null,
            "UG": "B.Tech/B.E.",
            "PG": "Not Specified",
            "Doctorate": "Not Specified",
            "Location": ["bengaluru"],
            "Key Skills": ["python", "sql"],
            "Role": "Analyst"
        });

        let job: CleanJob = serde_json::from_value(row).unwrap();
        assert_eq!(job.job_id, JobId::Number(7));
        assert_eq!(job.date_posted, NaiveDate::from_ymd_opt(2024, 9, 5).unwrap());
        assert!(job.has_salary());
        assert_eq!(job.applications, None);
        assert_eq!(job.other["Role"], "Analyst");

        let back = serde_json::to_value(&job).unwrap();
        assert_eq!(back["Date Posted"], "05-09-2024");
    }
}
