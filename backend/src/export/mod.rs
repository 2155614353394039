//! Writers handing the cleaned table to a downstream consumer.
//!
//! - JSON: an array of row objects, value sets as arrays
//! - CSV: one line per row, value sets joined with `", "`, nulls as empty cells

use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::ExportResult;
use crate::models::{value_text, JobTable};

const LIST_SEPARATOR: &str = ", ";

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown format '{}' (expected json or csv)", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Rows as JSON objects.
pub fn to_json_records(table: &JobTable) -> Vec<Value> {
    table.to_json_records()
}

/// Pretty-printed JSON array of rows.
pub fn to_json_string(table: &JobTable) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(&to_json_records(table))?)
}

pub fn write_json<W: Write>(table: &JobTable, mut writer: W) -> ExportResult<()> {
    serde_json::to_writer_pretty(&mut writer, &to_json_records(table))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the table as CSV in header order.
pub fn write_csv<W: Write>(table: &JobTable, writer: W) -> ExportResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.headers)?;

    for row in &table.rows {
        let cells = table
            .headers
            .iter()
            .map(|h| row.get(h).map(csv_cell).unwrap_or_default());
        out.write_record(cells)?;
    }

    out.flush()?;
    Ok(())
}

/// Render the table as a CSV string.
pub fn to_csv_string(table: &JobTable) -> ExportResult<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the table to a file in the given format.
pub fn write_to_path(table: &JobTable, path: &Path, format: ExportFormat) -> ExportResult<()> {
    let file = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Json => write_json(table, file),
        ExportFormat::Csv => write_csv(table, file),
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(value_text)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        Value::Object(_) => value.to_string(),
        scalar => value_text(scalar).unwrap_or_default(),
    }
}
