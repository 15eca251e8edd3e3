//! Tolerant type coercion for canonical product columns.
//!
//! | Column               | Target          | Unparsable / empty |
//! |----------------------|-----------------|--------------------|
//! | `price`, `discount`  | float           | null               |
//! | `quantity`           | integer         | null               |
//! | `available`          | tri-state bool  | null (unknown)     |
//!
//! Every other column is left as read. Coercion never fails: a value that
//! cannot be interpreted becomes a null for that cell.

use crate::models::{Cell, Table};

/// Target type for a coerced column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Float,
    Integer,
    TriStateBool,
}

/// Columns that are coerced, with their target type.
pub const COERCED_COLUMNS: [(&str, ColumnKind); 4] = [
    ("price", ColumnKind::Float),
    ("discount", ColumnKind::Float),
    ("quantity", ColumnKind::Integer),
    ("available", ColumnKind::TriStateBool),
];

const TRUE_VALUES: [&str; 4] = ["1", "true", "yes", "y"];
const FALSE_VALUES: [&str; 4] = ["0", "false", "no", "n"];

/// Per-column outcome of a coercion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionStats {
    pub column: String,
    pub kind: ColumnKind,
    /// Non-null values that could not be interpreted and became null.
    pub rejected: usize,
}

/// Parse a float, rejecting empty and non-finite input.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integer.
///
/// Accepts plain integers and decimals whose fractional part is zero
/// (`"3.0"` → 3). Any other fractional value is rejected rather than
/// truncated.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = parse_float(s)?;
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Classify a value as true, false, or unknown (`None`).
pub fn parse_tri_state_bool(raw: &str) -> Option<bool> {
    let lower = raw.trim().to_lowercase();
    if TRUE_VALUES.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_VALUES.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Coerce one cell to the given kind.
pub fn coerce_cell(cell: &Cell, kind: ColumnKind) -> Cell {
    let coerced = match (cell, kind) {
        (Cell::Null, _) => None,
        (Cell::Text(s), ColumnKind::Float) => parse_float(s).map(Cell::Float),
        (Cell::Text(s), ColumnKind::Integer) => parse_integer(s).map(Cell::Int),
        (Cell::Text(s), ColumnKind::TriStateBool) => parse_tri_state_bool(s).map(Cell::Bool),

        (Cell::Float(v), ColumnKind::Float) => Some(Cell::Float(*v)),
        (Cell::Int(v), ColumnKind::Float) => Some(Cell::Float(*v as f64)),
        (Cell::Int(v), ColumnKind::Integer) => Some(Cell::Int(*v)),
        (Cell::Float(v), ColumnKind::Integer) => parse_integer(&v.to_string()).map(Cell::Int),
        (Cell::Int(v), ColumnKind::TriStateBool) => parse_tri_state_bool(&v.to_string()).map(Cell::Bool),
        (Cell::Bool(b), ColumnKind::TriStateBool) => Some(Cell::Bool(*b)),

        _ => None,
    };
    coerced.unwrap_or(Cell::Null)
}

/// Coerce every canonical column present in the table.
///
/// Absent columns are skipped; columns outside [`COERCED_COLUMNS`] are
/// untouched.
pub fn coerce_types(table: &mut Table) -> Vec<CoercionStats> {
    let mut stats = Vec::new();

    for (column, kind) in COERCED_COLUMNS {
        let Some(index) = table.column_index(column) else {
            continue;
        };

        let mut rejected = 0;
        for row in table.rows.iter_mut() {
            let coerced = coerce_cell(&row[index], kind);
            if coerced.is_null() && !row[index].is_null() {
                rejected += 1;
            }
            row[index] = coerced;
        }

        if rejected > 0 {
            tracing::debug!(column, rejected, "values coerced to null");
        }
        stats.push(CoercionStats {
            column: column.to_string(),
            kind,
            rejected,
        });
    }

    stats
}
