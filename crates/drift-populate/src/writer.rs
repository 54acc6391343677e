//! Per-day file writers.

use crate::error::PopulateError;
use crate::format::OutputFormat;
use csv::Writer;
use drift_core::Record;
use drift_generator::DayBatch;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default buffer size for file writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Writes one day batch to one file.
pub trait DayWriter {
    /// Format produced by this writer.
    fn format(&self) -> OutputFormat;

    /// Write `batch` to `path`, replacing any existing file. Returns the
    /// number of bytes on disk.
    fn write_day(&self, batch: &DayBatch, path: &Path) -> Result<u64, PopulateError>;
}

/// Writer for `format`.
pub fn writer_for(format: OutputFormat) -> Box<dyn DayWriter> {
    match format {
        OutputFormat::Csv => Box::new(CsvDayWriter),
        OutputFormat::Json => Box::new(JsonDayWriter),
        OutputFormat::Jsonl => Box::new(JsonlDayWriter),
    }
}

/// CSV with a header row.
///
/// The header is the union of the keys of the day, so a column renamed
/// mid-day gets two cells and each row leaves the key it does not carry
/// empty. Nulls are empty cells too.
pub struct CsvDayWriter;

impl DayWriter for CsvDayWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write_day(&self, batch: &DayBatch, path: &Path) -> Result<u64, PopulateError> {
        let file = File::create(path)?;
        let mut writer = Writer::from_writer(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file));

        let headers = batch.field_names();
        writer.write_record(&headers)?;
        for record in &batch.records {
            writer.write_record(record_to_csv(record, &headers))?;
        }

        writer.flush()?;
        let inner = writer
            .into_inner()
            .map_err(|e| PopulateError::Io(std::io::Error::other(e.to_string())))?;
        drop(inner);

        Ok(std::fs::metadata(path)?.len())
    }
}

/// Convert a record to CSV cells in `headers` order.
fn record_to_csv(record: &Record, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|key| {
            record
                .get_field(key)
                .map(|value| value.to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// One pretty-printed JSON array per day.
pub struct JsonDayWriter;

impl DayWriter for JsonDayWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write_day(&self, batch: &DayBatch, path: &Path) -> Result<u64, PopulateError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);

        let rows: Vec<serde_json::Value> = batch.records.iter().map(Record::to_json).collect();
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writeln!(writer)?;
        writer.flush()?;
        drop(writer);

        Ok(std::fs::metadata(path)?.len())
    }
}

/// One JSON object per line.
pub struct JsonlDayWriter;

impl DayWriter for JsonlDayWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jsonl
    }

    fn write_day(&self, batch: &DayBatch, path: &Path) -> Result<u64, PopulateError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);

        for record in &batch.records {
            serde_json::to_writer(&mut writer, &record.to_json())?;
            writeln!(writer)?;
        }
        writer.flush()?;
        drop(writer);

        Ok(std::fs::metadata(path)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::FieldValue;
    use tempfile::TempDir;

    fn batch() -> DayBatch {
        DayBatch {
            day: 1,
            records: vec![
                Record::builder(1, 10)
                    .field("id", FieldValue::Int(10))
                    .field("score", FieldValue::Float(1.5))
                    .field("label", FieldValue::String("amber, dark".to_string()))
                    .build(),
                Record::builder(1, 11)
                    .field("id", FieldValue::Int(11))
                    .field("new-score", FieldValue::Null)
                    .field("label", FieldValue::String("cedar".to_string()))
                    .build(),
            ],
        }
    }

    #[test]
    fn test_record_to_csv() {
        let batch = batch();
        let headers = batch.field_names();
        assert_eq!(headers, vec!["id", "score", "label", "new-score"]);

        assert_eq!(
            record_to_csv(&batch.records[0], &headers),
            vec!["10", "1.5", "amber, dark", ""]
        );
        assert_eq!(
            record_to_csv(&batch.records[1], &headers),
            vec!["11", "", "cedar", ""]
        );
    }

    #[test]
    fn test_csv_day_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("1.csv");

        let bytes = CsvDayWriter.write_day(&batch(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(bytes, content.len() as u64);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,score,label,new-score");
        assert_eq!(lines[1], "10,1.5,\"amber, dark\",");
        assert_eq!(lines[2], "11,,cedar,");
    }

    #[test]
    fn test_json_day_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("1.json");

        JsonDayWriter.write_day(&batch(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["score"], 1.5);
        assert!(rows[1]["new-score"].is_null());
        assert!(rows[1].get("score").is_none());
    }

    #[test]
    fn test_jsonl_day_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("1.jsonl");

        JsonlDayWriter.write_day(&batch(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"id":10,"score":1.5,"label":"amber, dark"}"#
        );
        assert_eq!(lines[1], r#"{"id":11,"new-score":null,"label":"cedar"}"#);
    }

    #[test]
    fn test_writer_for_format() {
        for format in [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl] {
            assert_eq!(writer_for(format).format(), format);
        }
    }
}
