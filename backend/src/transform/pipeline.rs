//! High-level pipeline API for catalog cleaning.
//!
//! This module combines all stages into one synchronous run:
//!
//! ```text
//! raw table → normalize columns → trim → coerce → align → dedup → re-align → CSV + report
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_cleaner::transform::pipeline::{process_csv, CleanOptions};
//! use std::path::Path;
//!
//! let report = process_csv(
//!     Path::new("catalog.csv"),
//!     Path::new("catalog_clean.csv"),
//!     &CleanOptions::default(),
//! )?;
//! println!("Removed {} duplicates", report.duplicates_removed);
//! ```

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::coerce::coerce_types;
use super::columns::normalize_table_columns;
use super::dedup::deduplicate;
use super::report::{report_to_json, Report};
use super::schema::align_schema;
use super::trim::trim_text_cells;
use crate::error::{ColumnError, PipelineError, PipelineResult};
use crate::models::{expected_schema, Table, EXPECTED_SCHEMA};
use crate::parser::{parse_bytes, parse_csv_file};

/// Default column used to detect duplicates.
pub const DEFAULT_ID_COLUMN: &str = "id";

/// Options for one cleaning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Column to detect duplicates on; missing columns fall back to
    /// whole-row comparison.
    pub id_column: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
        }
    }
}

impl CleanOptions {
    pub fn with_id_column(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
        }
    }
}

/// A cleaned table plus the measurements taken while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    pub table: Table,
    pub id_column_used: Option<String>,
    pub total_rows: usize,
    pub duplicates_detected: usize,
    pub null_cells: usize,
    pub normalized_columns: Vec<String>,
    pub added_missing_columns: Vec<String>,
}

impl CleanedTable {
    pub fn cleaned_rows(&self) -> usize {
        self.table.len()
    }

    /// Build the run report.
    pub fn report(&self, input_file: impl Into<String>, output_file: impl Into<String>) -> Report {
        Report {
            input_file: input_file.into(),
            output_file: output_file.into(),
            id_column_used: self.id_column_used.clone(),
            total_rows: self.total_rows,
            cleaned_rows: self.cleaned_rows(),
            duplicates_detected: self.duplicates_detected,
            duplicates_removed: self.total_rows - self.cleaned_rows(),
            null_cells: self.null_cells,
            columns: self.table.columns.clone(),
            normalized_columns: self.normalized_columns.clone(),
            added_missing_columns: self.added_missing_columns.clone(),
            expected_schema: expected_schema(),
        }
    }
}

/// Run every cleaning stage on an in-memory table.
///
/// Fails only if two headers normalize to the same name.
pub fn clean_table(mut table: Table, options: &CleanOptions) -> Result<CleanedTable, ColumnError> {
    let normalized = normalize_table_columns(&mut table)?;
    let trimmed = trim_text_cells(&mut table);
    tracing::debug!(cells = trimmed, "trimmed text cells");
    coerce_types(&mut table);

    let total_rows = table.len();
    let null_cells = table.null_count();

    let added_missing_columns = align_schema(&mut table, &EXPECTED_SCHEMA);

    let outcome = deduplicate(table, &options.id_column);
    let id_column_used = outcome.id_column_used().map(str::to_string);
    let duplicates_detected = outcome.duplicates_detected;
    let mut table = outcome.table;

    // Re-align after dedup; only the first pass is reported.
    align_schema(&mut table, &EXPECTED_SCHEMA);

    Ok(CleanedTable {
        table,
        id_column_used,
        total_rows,
        duplicates_detected,
        null_cells,
        normalized_columns: normalized.names,
        added_missing_columns,
    })
}

/// Write a table as CSV with a header row.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.columns)?;
    for row in &table.rows {
        out.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    out.flush()?;
    Ok(())
}

/// Clean CSV bytes and write the cleaned CSV to `output`.
///
/// `input_label` and `output_label` are recorded verbatim in the report.
pub fn clean_bytes<W: Write>(
    bytes: &[u8],
    output: W,
    input_label: &str,
    output_label: &str,
    options: &CleanOptions,
) -> PipelineResult<Report> {
    let cleaned = clean_table(parse_bytes(bytes)?, options)?;
    finish(cleaned, output, input_label, output_label)
}

fn finish<W: Write>(
    cleaned: CleanedTable,
    output: W,
    input_label: &str,
    output_label: &str,
) -> PipelineResult<Report> {
    write_table(&cleaned.table, output)?;

    let report = cleaned.report(input_label, output_label);
    tracing::info!(
        input = %report.input_file,
        output = %report.output_file,
        total = report.total_rows,
        cleaned = report.cleaned_rows,
        duplicates = report.duplicates_removed,
        nulls = report.null_cells,
        "cleaned catalog"
    );
    Ok(report)
}

/// Clean a CSV file on disk.
///
/// The output's parent directory is created if needed. Nothing is written
/// when the input cannot be parsed or its headers collide.
pub fn process_csv(input: &Path, output: &Path, options: &CleanOptions) -> PipelineResult<Report> {
    if !input.exists() {
        return Err(PipelineError::InputNotFound(input.to_path_buf()));
    }

    let cleaned = clean_table(parse_csv_file(input)?, options)?;

    ensure_parent_dir(output)?;
    let writer = BufWriter::new(File::create(output)?);
    finish(
        cleaned,
        writer,
        &input.display().to_string(),
        &output.display().to_string(),
    )
}

/// Render a report and write it to `path`, creating parent directories.
///
/// Returns the rendered JSON.
pub fn save_report(report: &Report, path: &Path, pretty: bool) -> PipelineResult<String> {
    let json = report_to_json(report, pretty)?;
    ensure_parent_dir(path)?;
    fs::write(path, &json)?;
    Ok(json)
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
