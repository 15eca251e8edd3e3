//! Cleaning pipeline.
//!
//! This module handles the catalog cleaning stages, in pipeline order:
//! - Columns: header normalization and typo correction
//! - Trim: whitespace removal on text cells
//! - Coerce: tolerant typing of price, discount, quantity, available
//! - Schema: expected-column alignment
//! - Dedup: duplicate detection and removal
//! - Report: run statistics
//! - Pipeline: orchestration and CSV output

pub mod coerce;
pub mod columns;
pub mod dedup;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod trim;

pub use coerce::{coerce_types, ColumnKind};
pub use columns::{normalize_column_name, normalize_columns, COLUMN_FIXES};
pub use dedup::{deduplicate, DedupKey, DedupOutcome};
pub use pipeline::*;
pub use report::{report_to_json, Report};
pub use schema::align_schema;
pub use trim::trim_text_cells;
