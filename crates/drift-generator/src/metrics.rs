//! Run metrics reported alongside the generated data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-column counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetrics {
    /// Values produced
    pub values_generated: u64,
    /// Values produced while the column's transition was active
    pub activated_rows: u64,
    /// First day on which the transition was active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_active_day: Option<u32>,
    /// Nulls emitted
    pub nulls: u64,
    /// Zeros forced by the zero effect
    pub zeros: u64,
    /// Numeric values emitted as strings
    pub stringified: u64,
}

/// Metrics of one column, tagged with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub name: String,
    #[serde(flatten)]
    pub metrics: ColumnMetrics,
}

/// Metrics of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Rows generated so far
    pub total_rows: u64,
    /// Number of columns
    pub total_columns: usize,
    /// Days fully generated
    pub days_completed: u32,
    /// Realized row count of every completed day
    pub rows_per_day: BTreeMap<u32, u64>,
    /// Per-column counters in configuration order
    pub columns: Vec<ColumnReport>,
}

impl RunMetrics {
    /// Get the metrics of a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnMetrics> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.metrics)
    }

    /// Names of the columns whose transition has been reached.
    pub fn transitioned_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.metrics.activated_rows > 0)
            .map(|c| c.name.as_str())
            .collect()
    }
}
