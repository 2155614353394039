//! CSV loader with encoding and delimiter auto-detection.
//!
//! Turns a raw export into a [`JobTable`]. Every cell is loaded as text;
//! empty cells become null. Typing is the pipeline's job.

use serde_json::Value;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{JobTable, Record};

const BOM: char = '\u{feff}';

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Loaded rows
    pub table: JobTable,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        // Charsets encoding_rs cannot decode are read as (lossy) UTF-8
        other if encoding_rs::Encoding::for_label(other.as_bytes()).is_none() => "utf-8".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Invalid UTF-8 sequences are replaced. A label encoding_rs does not know
/// is a [`CsvError::EncodingError`].
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => return Err(CsvError::EncodingError(format!("unknown encoding '{}'", encoding))),
        },
    };
    Ok(decoded)
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Defaults to `,` when the header holds a single column.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;
    for sep in [',', ';', '\t', '|'] {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }
    best_sep
}

/// Parse CSV text with an explicit delimiter.
///
/// Quoted fields may span lines. Rows shorter than the header are padded
/// with null; extra cells are ignored.
pub fn parse_csv_str(content: &str, delimiter: char) -> CsvResult<ParseResult> {
    let table = read_table(content, delimiter)?;
    Ok(ParseResult { table, encoding: "utf-8".to_string(), delimiter })
}

/// Parse CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(content.trim_start_matches(BOM));
    let table = read_table(&content, delimiter)?;

    Ok(ParseResult { table, encoding, delimiter })
}

fn read_table(content: &str, delimiter: char) -> CsvResult<JobTable> {
    let content = content.trim_start_matches(BOM);
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delimiter = u8::try_from(delimiter).map_err(|_| CsvError::ParseError {
        line: 1,
        message: format!("Delimiter '{}' is not a single-byte character", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut table = JobTable::new(headers);
    for result in reader.records() {
        let record = result?;
        let mut row = Record::new();
        for (i, header) in table.headers.iter().enumerate() {
            let cell = match record.get(i) {
                Some(text) if !text.trim().is_empty() => Value::String(text.to_string()),
                _ => Value::Null,
            };
            row.insert(header.clone(), cell);
        }
        table.rows.push(row);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let result = parse_csv_str("Job ID;Company\n1;Acme\n2;Globex", ';').unwrap();
        let table = result.table;

        assert_eq!(table.headers, vec!["Job ID", "Company"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0]["Company"], "Acme");
        assert_eq!(table.rows[1]["Job ID"], "2");
    }

    #[test]
    fn test_multiline_quoted_field() {
        let csv = "Job ID,Education\n1,\"UG: B.Tech/B.E.\nPG: MBA/PGDM\"\n2,\n";
        let table = parse_csv_str(csv, ',').unwrap().table;

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0]["Education"], "UG: B.Tech/B.E.\nPG: MBA/PGDM");
        assert_eq!(table.rows[1]["Education"], Value::Null);
    }

    #[test]
    fn test_quoted_commas_stay_in_cell() {
        let csv = "Job ID,Location\n7,\"Pune, Mumbai (All Areas)\"";
        let table = parse_csv_str(csv, ',').unwrap().table;
        assert_eq!(table.rows[0]["Location"], "Pune, Mumbai (All Areas)");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_csv_str("a,b,c\n1,,3\n4", ',').unwrap().table;

        assert_eq!(table.rows[0]["b"], Value::Null);
        assert_eq!(table.rows[1]["a"], "4");
        assert_eq!(table.rows[1]["c"], Value::Null);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_csv_str("", ','), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_bytes_auto(b"  \n"), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single\nvalue"), ',');
    }

    #[test]
    fn test_auto_parse_strips_bom() {
        let csv = "\u{feff}Job ID;Salary\n1;3 Lacs P.A.";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.table.headers, vec!["Job ID", "Salary"]);
        assert_eq!(result.table.rows[0]["Salary"], "3 Lacs P.A.");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_unknown_encoding_label_is_an_error() {
        let err = decode_content(b"Job ID\n1\n", "no-such-charset").unwrap_err();
        assert!(matches!(err, CsvError::EncodingError(_)));

        let decoded = decode_content(b"Job ID", "shift_jis").unwrap();
        assert_eq!(decoded, "Job ID");
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        std::fs::write(&path, "Job ID,Company\n1,Acme\n").unwrap();

        let result = parse_csv_file_auto(&path).unwrap();
        assert_eq!(result.delimiter, ',');
        assert_eq!(result.table.len(), 1);

        let missing = parse_csv_file_auto(dir.path().join("nope.csv"));
        assert!(matches!(missing, Err(CsvError::IoError(_))));
    }
}
