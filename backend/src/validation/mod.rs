//! JSON Schema validation for cleaned job rows.
//!
//! Two layers:
//! - the draft 7 schema `schemas/clean-job.json`, embedded at compile time,
//!   checks column presence and types
//! - [`validate_clean_job`] adds the cross-field rules a schema cannot
//!   express (salary triple consistency, sorted value sets)
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use joblist::validation::validate;
//!
//! let schema = json!({
//!     "type": "object",
//!     "required": ["Job ID"]
//! });
//! assert!(validate(&schema, &json!({ "Job ID": 1 })).is_ok());
//! assert!(validate(&schema, &json!({})).is_err());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::models::columns;

static CLEAN_JOB_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/clean-job.json"))
        .expect("Invalid embedded schema")
});

/// Average may differ from the midpoint by float rounding only.
const SALARY_TOLERANCE: f64 = 1e-6;

/// Validate a JSON value against a draft 7 schema.
///
/// Returns every error message when invalid.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Yes/no variant of [`validate`].
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Embedded schema for one cleaned row.
pub fn clean_job_schema() -> &'static Value {
    &CLEAN_JOB_SCHEMA
}

/// Validate a cleaned row: schema first, then cross-field rules.
pub fn validate_clean_job(data: &Value) -> Result<(), Vec<String>> {
    validate(&CLEAN_JOB_SCHEMA, data)?;

    let mut errors = Vec::new();
    check_salary_triple(data, &mut errors);
    for col in [columns::LOCATION, columns::KEY_SKILLS] {
        check_sorted_set(data, col, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check of a cleaned row.
pub fn is_valid_clean_job(data: &Value) -> bool {
    validate_clean_job(data).is_ok()
}

/// All three salary cells absent, or all present with a midpoint average.
fn check_salary_triple(data: &Value, errors: &mut Vec<String>) {
    let min = data.get(columns::MIN_SALARY).and_then(Value::as_f64);
    let max = data.get(columns::MAX_SALARY).and_then(Value::as_f64);
    let avg = data.get(columns::AVERAGE_SALARY).and_then(Value::as_f64);

    match (min, max, avg) {
        (None, None, None) => {}
        (Some(min), Some(max), Some(avg)) => {
            if ((min + max) / 2.0 - avg).abs() > SALARY_TOLERANCE {
                errors.push(format!(
                    "{} {} is not the midpoint of {} and {}",
                    columns::AVERAGE_SALARY, avg, min, max
                ));
            }
        }
        _ => errors.push("Salary cells must be all present or all absent".to_string()),
    }
}

fn check_sorted_set(data: &Value, column: &str, errors: &mut Vec<String>) {
    let Some(items) = data.get(column).and_then(Value::as_array) else {
        return;
    };
    let values: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
    if values.windows(2).any(|w| w[0] >= w[1]) {
        errors.push(format!("{} must be sorted without duplicates", column));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clean_row() -> Value {
        json!({
            "Job ID": 17,
            "Job Title": "Data Analyst",
            "Company": "Acme",
            "Min_Experience": 2,
            "Max_Experience": 5,
            "Min_Salary": 300000.0,
            "Max_Salary": 500000.0,
            "Average_Salary": 400000.0,
            "Days Posted On": 5,
            "Date Posted": "05-09-2024",
            "Applications": 9,
            "UG": "B.Tech/B.E.",
            "PG": "Not Specified",
            "Doctorate": "Not Specified",
            "Location": ["bengaluru", "pune"],
            "Key Skills": ["python", "sql"]
        })
    }

    #[test]
    fn test_valid_row() {
        assert!(validate_clean_job(&clean_row()).is_ok());
        assert!(is_valid(clean_job_schema(), &clean_row()));
    }

    #[test]
    fn test_undisclosed_salary_is_valid() {
        let mut row = clean_row();
        for col in ["Min_Salary", "Max_Salary", "Average_Salary", "Applications"] {
            row[col] = Value::Null;
        }
        assert!(is_valid_clean_job(&row));
    }

    #[test]
    fn test_schema_errors() {
        let mut row = clean_row();
        row["Date Posted"] = json!("2024-09-05");
        row["Min_Experience"] = json!(-1);
        let errors = validate_clean_job(&row).unwrap_err();
        assert_eq!(errors.len(), 2);

        let missing = validate_clean_job(&json!({ "Job ID": 1 })).unwrap_err();
        assert!(!missing.is_empty());
    }

    #[test]
    fn test_partial_salary_triple() {
        let mut row = clean_row();
        row["Max_Salary"] = Value::Null;
        let errors = validate_clean_job(&row).unwrap_err();
        assert!(errors[0].contains("all present or all absent"));
    }

    #[test]
    fn test_average_must_be_midpoint() {
        let mut row = clean_row();
        row["Average_Salary"] = json!(450000.0);
        assert!(!is_valid_clean_job(&row));
    }

    #[test]
    fn test_unsorted_or_duplicate_lists() {
        let mut row = clean_row();
        row["Location"] = json!(["pune", "bengaluru"]);
        assert!(!is_valid_clean_job(&row));

        let mut row = clean_row();
        row["Key Skills"] = json!(["sql", "sql"]);
        // Caught by the schema's uniqueItems
        assert!(!is_valid_clean_job(&row));
    }
}
