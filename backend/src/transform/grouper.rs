//! Explode multi-valued cells into one row per value, then group them back
//! per job.
//!
//! # Architecture
//!
//! ```text
//! Table (one row per job)          Exploded (one row per value)       Table (merged back)
//! ┌──────────────────────────┐     ┌────────────────────────┐        ┌─────────────────────────┐
//! │ 17 │ "Pune(Hinjewadi),   │     │ 17 │ "Pune(Hinjewadi)"  │        │ 17 │ ["mumbai", "pune"] │
//! │    │  Mumbai, pune"      │  →  │ 17 │ " Mumbai"          │  →     │ 18 │ []                 │
//! │ 18 │ null                │     │ 17 │ " pune"            │        └─────────────────────────┘
//! └──────────────────────────┘     └────────────────────────┘
//! ```
//!
//! Grouping goes through an explicit key per job, never through row order.
//! Each group is de-duplicated and sorted.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{cell_text, columns, JobId, JobTable, Record};

const VALUE_SEPARATOR: char = ',';

/// One (job, value) pair of an exploded column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplodedValue {
    pub key: String,
    pub value: String,
}

/// Key a row is grouped under. Rows without a job id group on their position.
pub fn group_key(row: &Record, index: usize) -> String {
    row.get(columns::JOB_ID)
        .and_then(JobId::from_value)
        .map(|id| id.key())
        .unwrap_or_else(|| format!("#row-{}", index))
}

/// Split a column on commas into one entry per part.
pub fn explode(table: &JobTable, column: &str) -> Vec<ExplodedValue> {
    let mut exploded = Vec::new();
    for (i, row) in table.rows.iter().enumerate() {
        let Some(text) = cell_text(row, column) else {
            continue;
        };
        let key = group_key(row, i);
        for part in text.split(VALUE_SEPARATOR) {
            exploded.push(ExplodedValue { key: key.clone(), value: part.to_string() });
        }
    }
    exploded
}

/// Group exploded values per key: cleaned, empty values dropped,
/// de-duplicated and sorted.
pub fn aggregate<F>(exploded: Vec<ExplodedValue>, clean: F) -> BTreeMap<String, Vec<String>>
where
    F: Fn(&str) -> String,
{
    let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in exploded {
        let cleaned = clean(&entry.value);
        let set = groups.entry(entry.key).or_default();
        if !cleaned.is_empty() {
            set.insert(cleaned);
        }
    }

    groups
        .into_iter()
        .map(|(key, set)| (key, set.into_iter().collect()))
        .collect()
}

/// Replace `column` in every row with its group's values. Rows without a
/// group get an empty list.
pub fn merge_back(table: &mut JobTable, column: &str, groups: &BTreeMap<String, Vec<String>>) {
    table.ensure_column(column);
    for (i, row) in table.rows.iter_mut().enumerate() {
        let values = groups.get(&group_key(row, i)).cloned().unwrap_or_default();
        row.insert(
            column.to_string(),
            Value::Array(values.into_iter().map(Value::String).collect()),
        );
    }
}

/// Explode, clean, aggregate and merge one column in place.
///
/// Returns the number of distinct values written across all rows.
pub fn expand_and_aggregate<F>(table: &mut JobTable, column: &str, clean: F) -> usize
where
    F: Fn(&str) -> String,
{
    let groups = aggregate(explode(table, column), clean);
    merge_back(table, column, &groups);
    groups.values().map(Vec::len).sum()
}
