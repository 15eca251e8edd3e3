//! Run report.
//!
//! One [`Report`] is produced per pipeline run and serialized as JSON next to
//! the cleaned table.

use serde::{Deserialize, Serialize};

/// Statistics of one cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub input_file: String,
    pub output_file: String,
    /// `None` when the configured id column was absent.
    pub id_column_used: Option<String>,
    pub total_rows: usize,
    pub cleaned_rows: usize,
    pub duplicates_detected: usize,
    /// Always `total_rows - cleaned_rows`.
    pub duplicates_removed: usize,
    /// Nulls after type coercion, before alignment and deduplication.
    pub null_cells: usize,
    /// Output column order.
    pub columns: Vec<String>,
    /// Header row right after normalization, in input order.
    pub normalized_columns: Vec<String>,
    pub added_missing_columns: Vec<String>,
    pub expected_schema: Vec<String>,
}

/// Serialize a report, pretty (2-space indent) or compact.
pub fn report_to_json(report: &Report, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}
