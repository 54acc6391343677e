//! Checks on a directory of generated day files.

use crate::format::OutputFormat;
use std::path::Path;
use tracing::warn;

/// List the day files of `0..num_days` that are missing or empty.
///
/// An empty result means the directory holds a complete run.
pub fn validate_output(dir: &Path, format: OutputFormat, num_days: u32) -> Vec<String> {
    let mut issues = Vec::new();

    if !dir.is_dir() {
        issues.push(format!("Output directory '{}' does not exist", dir.display()));
        return issues;
    }

    for day in 0..num_days {
        let path = dir.join(format.file_name(day));
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.len() == 0 => {
                issues.push(format!("Day {day}: '{}' is empty", path.display()));
            }
            Ok(_) => {}
            Err(_) => {
                issues.push(format!("Day {day}: '{}' is missing", path.display()));
            }
        }
    }

    if !issues.is_empty() {
        warn!("{} issues found in '{}'", issues.len(), dir.display());
    }
    issues
}
