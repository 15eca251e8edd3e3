//! Duplicate detection and removal.
//!
//! Keys rows by the id column when it exists, otherwise by the full row.
//! The first occurrence of each key is kept, in original order. Null keys
//! are equal to each other.

use std::collections::HashSet;

use crate::models::{CellKey, Table};

/// How duplicates were identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupKey {
    /// Rows compared on a single id column.
    Column(String),
    /// Rows compared on every cell.
    FullRow,
}

/// Outcome of a deduplication pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    pub table: Table,
    pub key: DedupKey,
    /// Rows flagged as a repeat of an earlier row.
    pub duplicates_detected: usize,
}

impl DedupOutcome {
    /// The id column actually used, if any.
    pub fn id_column_used(&self) -> Option<&str> {
        match &self.key {
            DedupKey::Column(name) => Some(name),
            DedupKey::FullRow => None,
        }
    }
}

/// Flag rows that repeat an earlier row's key.
///
/// Falls back to whole-row comparison when `id_column` is not in the table.
pub fn duplicate_mask(table: &Table, id_column: &str) -> (DedupKey, Vec<bool>) {
    match table.column_index(id_column) {
        Some(index) => {
            let mut seen: HashSet<CellKey<'_>> = HashSet::with_capacity(table.len());
            let mask = table
                .rows
                .iter()
                .map(|row| !seen.insert(row[index].key()))
                .collect();
            (DedupKey::Column(id_column.to_string()), mask)
        }
        None => {
            let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.len());
            let mask = table
                .rows
                .iter()
                .map(|row| !seen.insert(row.iter().map(|cell| cell.key()).collect()))
                .collect();
            (DedupKey::FullRow, mask)
        }
    }
}

/// Remove duplicate rows, keeping first occurrences.
pub fn deduplicate(table: Table, id_column: &str) -> DedupOutcome {
    let (key, mask) = duplicate_mask(&table, id_column);
    let duplicates_detected = mask.iter().filter(|dup| **dup).count();

    if key == DedupKey::FullRow {
        tracing::debug!(id_column, "id column absent, comparing full rows");
    }

    let Table { columns, rows } = table;
    let rows = rows
        .into_iter()
        .zip(mask)
        .filter_map(|(row, dup)| (!dup).then_some(row))
        .collect();

    DedupOutcome {
        table: Table { columns, rows },
        key,
        duplicates_detected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_id_dedup_keeps_first() {
        let mut table = Table::new(vec!["id".into(), "name".into()]);
        table.push_row(vec![text("1"), text("A")]);
        table.push_row(vec![text("1"), text("A-dup")]);
        table.push_row(vec![text("2"), text("B")]);

        let outcome = deduplicate(table, "id");

        assert_eq!(outcome.duplicates_detected, 1);
        assert_eq!(outcome.id_column_used(), Some("id"));
        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.table.rows[0], vec![text("1"), text("A")]);
        assert_eq!(outcome.table.rows[1], vec![text("2"), text("B")]);
    }

    #[test]
    fn test_missing_id_column_falls_back_to_full_row() {
        let mut table = Table::new(vec!["x".into()]);
        table.push_row(vec![text("1")]);
        table.push_row(vec![text("1")]);
        table.push_row(vec![text("2")]);

        let outcome = deduplicate(table, "zzz");

        assert_eq!(outcome.key, DedupKey::FullRow);
        assert_eq!(outcome.id_column_used(), None);
        assert_eq!(outcome.duplicates_detected, 1);
        assert_eq!(outcome.table.len(), 2);
    }

    #[test]
    fn test_null_ids_are_duplicates_of_each_other() {
        let mut table = Table::new(vec!["id".into(), "name".into()]);
        table.push_row(vec![Cell::Null, text("first")]);
        table.push_row(vec![text("7"), text("seven")]);
        table.push_row(vec![Cell::Null, text("second")]);

        let outcome = deduplicate(table, "id");

        assert_eq!(outcome.duplicates_detected, 1);
        assert_eq!(outcome.table.rows[0][1], text("first"));
    }

    #[test]
    fn test_full_row_compares_typed_values() {
        let mut table = Table::new(vec!["price".into(), "sku".into()]);
        table.push_row(vec![Cell::Float(1.0), text("A")]);
        table.push_row(vec![Cell::Float(1.0), text("A")]);
        table.push_row(vec![Cell::Float(1.0), text("B")]);
        table.push_row(vec![Cell::Null, text("A")]);

        let outcome = deduplicate(table, "id");

        assert_eq!(outcome.duplicates_detected, 1);
        assert_eq!(outcome.table.len(), 3);
    }

    #[test]
    fn test_removed_equals_detected() {
        let mut table = Table::new(vec!["id".into()]);
        for id in ["a", "b", "a", "c", "b", "a"] {
            table.push_row(vec![text(id)]);
        }
        let total = table.len();

        let outcome = deduplicate(table, "id");

        assert_eq!(total - outcome.table.len(), outcome.duplicates_detected);
        assert_eq!(outcome.duplicates_detected, 3);
    }
}
