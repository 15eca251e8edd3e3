//! # Catalog Cleaner - product catalog CSV cleaning
//!
//! Catalog Cleaner repairs product catalog CSV exports: it fixes misspelled
//! headers, trims values, coerces prices, quantities and availability flags,
//! aligns the table to a fixed product schema and removes duplicate rows.
//! Every run produces a cleaned CSV and a JSON report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│ Clean CSV + │
//! │ (UTF-8/BOM) │     │  (raw text) │     │ (5 stages)  │     │ JSON report │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog_cleaner::{process_csv, report_to_json, CleanOptions};
//! use std::path::Path;
//!
//! let report = process_csv(
//!     Path::new("products.csv"),
//!     Path::new("products_clean.csv"),
//!     &CleanOptions::default(),
//! )?;
//! println!("{}", report_to_json(&report, true)?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Server and watcher configuration
//! - [`models`] - Domain models (Cell, Table, expected schema)
//! - [`parser`] - CSV reading with BOM tolerance
//! - [`transform`] - Cleaning stages, report and pipeline
//! - [`watch`] - Directory-watch batch mode
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Batch mode
pub mod watch;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ColumnError, CsvError, PipelineError, ServerError, WatchError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, Table, EXPECTED_SCHEMA};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    clean_bytes,
    clean_table,
    process_csv,
    save_report,
    write_table,
    CleanOptions,
    CleanedTable,
    DEFAULT_ID_COLUMN,
};
pub use transform::report::{report_to_json, Report};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{ServerConfig, WatchConfig};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
