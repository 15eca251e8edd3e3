//! Domain models for the catalog cleaning pipeline.
//!
//! This module contains the core data structures shared by every stage:
//!
//! - [`Cell`] - A single typed cell value (null, text, float, integer, boolean)
//! - [`Table`] - An in-memory table: ordered column names plus rows of cells
//! - [`EXPECTED_SCHEMA`] - The fixed, ordered list of canonical product columns

use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// Expected Schema
// =============================================================================

/// Canonical product columns, in output order.
///
/// Every cleaned table exposes all of these first, followed by any extra
/// columns in their original relative order.
pub const EXPECTED_SCHEMA: [&str; 10] = [
    "id",
    "name",
    "price",
    "description",
    "image_url",
    "quantity",
    "category",
    "sku",
    "available",
    "discount",
];

/// The expected schema as owned strings (used in reports).
pub fn expected_schema() -> Vec<String> {
    EXPECTED_SCHEMA.iter().map(|c| c.to_string()).collect()
}

// =============================================================================
// Cell
// =============================================================================

/// A typed cell value.
///
/// Cells come out of the parser as [`Cell::Text`] or [`Cell::Null`]. Only the
/// type coercer produces the other variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Absent value.
    Null,
    /// Raw or trimmed text.
    Text(String),
    /// Floating point value (`price`, `discount`).
    Float(f64),
    /// Integer value (`quantity`).
    Int(i64),
    /// Boolean value (`available`).
    Bool(bool),
}

impl Cell {
    /// Build a cell from a raw CSV field. Empty fields are null.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Cell::Null
        } else {
            Cell::Text(field.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Hashable view of the cell, used for duplicate detection.
    ///
    /// Two nulls compare equal. Floats compare by bit pattern after folding
    /// `-0.0` into `0.0`.
    pub fn key(&self) -> CellKey<'_> {
        match self {
            Cell::Null => CellKey::Null,
            Cell::Text(s) => CellKey::Text(s),
            Cell::Float(f) => {
                let f = if *f == 0.0 { 0.0 } else { *f };
                CellKey::Float(f.to_bits())
            }
            Cell::Int(i) => CellKey::Int(*i),
            Cell::Bool(b) => CellKey::Bool(*b),
        }
    }
}

/// Renders the value the way it is written to the cleaned CSV.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Borrowed, hashable projection of a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKey<'a> {
    Null,
    Text(&'a str),
    Float(u64),
    Int(i64),
    Bool(bool),
}

impl Hash for CellKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellKey::Null => {}
            CellKey::Text(s) => s.hash(state),
            CellKey::Float(bits) => bits.hash(state),
            CellKey::Int(i) => i.hash(state),
            CellKey::Bool(b) => b.hash(state),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// An in-memory table.
///
/// Rows are stored positionally against `columns`, so every row always shares
/// the same column set and order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with nulls or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate over the values of one column.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Total number of null cells in the table.
    pub fn null_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_null())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_field_is_null() {
        assert_eq!(Cell::from_field(""), Cell::Null);
        assert_eq!(Cell::from_field("  "), Cell::Text("  ".into()));
    }

    #[test]
    fn test_null_keys_are_equal() {
        let mut seen = HashSet::new();
        assert!(seen.insert(Cell::Null.key()));
        assert!(!seen.insert(Cell::Null.key()));
    }

    #[test]
    fn test_signed_zero_keys_match() {
        assert_eq!(Cell::Float(0.0).key(), Cell::Float(-0.0).key());
        assert_ne!(Cell::Float(1.0).key(), Cell::Int(1).key());
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Float(19.5).to_string(), "19.5");
        assert_eq!(Cell::Int(-3).to_string(), "-3");
        assert_eq!(Cell::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_push_row_pads_to_width() {
        let mut table = Table::new(vec!["a".into(), "b".into(), "c".into()]);
        table.push_row(vec![Cell::Text("1".into())]);
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.null_count(), 2);
    }
}
