//! Output formats.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File format of the per-day output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values with a header row
    #[default]
    #[value(name = "csv")]
    Csv,
    /// One pretty-printed JSON array per day
    #[value(name = "json")]
    Json,
    /// One JSON object per line
    #[value(name = "jsonl")]
    Jsonl,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }

    /// Name of the file holding `day`.
    pub fn file_name(&self, day: u32) -> String {
        format!("{day}.{}", self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(OutputFormat::Csv.file_name(0), "0.csv");
        assert_eq!(OutputFormat::Json.file_name(3), "3.json");
        assert_eq!(OutputFormat::Jsonl.file_name(12), "12.jsonl");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&OutputFormat::Jsonl).unwrap(), "\"jsonl\"");
        let format: OutputFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(format, OutputFormat::Csv);
    }
}
