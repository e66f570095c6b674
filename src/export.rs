//! JSON and CSV export of run results.

use crate::errors::{AppError, ResultExt};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

pub type Record = Map<String, Value>;

/// Converts serializable rows to JSON objects for [`write_csv`].
///
/// Rows that do not serialize to an object are rejected.
pub fn to_records<T: Serialize>(rows: &[T]) -> Result<Vec<Record>, AppError> {
    rows.iter()
        .map(|row| match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map),
            other => Err(AppError::Io(format!(
                "CSV rows must serialize to objects, got {}",
                other
            ))),
        })
        .collect()
}

/// Keys of the first record, in insertion order.
///
/// For callers that have no schema of their own. Records with other keys will
/// get empty cells for the missing columns and lose the extra ones.
pub fn columns_from_first(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}

/// Writes `records` to `path` as CSV with a header row of `columns`.
///
/// Does nothing, and creates no file, when `records` is empty.
pub fn write_csv<S: AsRef<str>>(
    records: &[Record],
    columns: &[S],
    path: &Path,
) -> Result<(), AppError> {
    if records.is_empty() {
        tracing::debug!("No records to export, skipping {}", path.display());
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let header: Vec<&str> = columns.iter().map(|column| column.as_ref()).collect();
    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|column| cell(record.get(*column))))?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Writes `value` as pretty-printed UTF-8 JSON. Non-ASCII text is kept as is.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), AppError> {
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_write_csv_header_and_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![record(json!({"a": 1, "b": 2})), record(json!({"a": 3, "b": 4}))];

        write_csv(&records, &columns_from_first(&records), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["a,b", "1,2", "3,4"]);
    }

    #[test]
    fn test_write_csv_empty_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_csv::<&str>(&[], &["a", "b"], &path).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_write_csv_explicit_schema_fills_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.csv");
        let records = vec![
            record(json!({"name": "Asha", "title": "CTO"})),
            record(json!({"name": "Ravi, K", "extra": true})),
        ];

        write_csv(&records, &["name", "title"], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["name,title", "Asha,CTO", "\"Ravi, K\","]);
    }

    #[test]
    fn test_write_json_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_json(&json!([{"name": "Sérgio Chennai — சென்னை"}]), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("சென்னை"));
        assert!(content.contains("\n  {"));
    }

    #[test]
    fn test_to_records_rejects_scalars() {
        assert!(to_records(&[1, 2]).is_err());
        let rows = to_records(&[json!({"x": null})]).unwrap();
        assert_eq!(columns_from_first(&rows), vec!["x".to_string()]);
    }
}
