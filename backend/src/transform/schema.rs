//! Schema alignment.
//!
//! Ensures every expected column exists and puts the table in canonical
//! order: expected columns first (fixed order), then extras in their original
//! relative order.

use crate::models::{Cell, Table};

/// Align a table to the expected schema.
///
/// Missing expected columns are synthesized as all-null columns. Returns the
/// names of synthesized columns in schema order. Aligning an aligned table is
/// a no-op that returns an empty list.
pub fn align_schema(table: &mut Table, expected: &[&str]) -> Vec<String> {
    let mut added = Vec::new();
    let mut order: Vec<Option<usize>> = Vec::with_capacity(table.columns.len() + expected.len());
    let mut columns = Vec::with_capacity(order.capacity());

    for &name in expected {
        let index = table.column_index(name);
        if index.is_none() {
            added.push(name.to_string());
        }
        order.push(index);
        columns.push(name.to_string());
    }

    for (index, name) in table.columns.iter().enumerate() {
        if !expected.contains(&name.as_str()) {
            order.push(Some(index));
            columns.push(name.clone());
        }
    }

    let already_aligned = added.is_empty()
        && order
            .iter()
            .enumerate()
            .all(|(position, source)| *source == Some(position));
    if already_aligned {
        return added;
    }

    for row in table.rows.iter_mut() {
        let mut old = std::mem::take(row);
        *row = order
            .iter()
            .map(|source| match source {
                Some(i) => std::mem::replace(&mut old[*i], Cell::Null),
                None => Cell::Null,
            })
            .collect();
    }
    table.columns = columns;

    if !added.is_empty() {
        tracing::debug!(columns = ?added, "synthesized missing columns");
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EXPECTED_SCHEMA;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn full_table() -> Table {
        let mut columns: Vec<String> = EXPECTED_SCHEMA.iter().map(|c| c.to_string()).collect();
        columns.push("supplier".into());
        let mut table = Table::new(columns);
        table.push_row((0..11).map(|i| text(&i.to_string())).collect());
        table
    }

    #[test]
    fn test_missing_columns_are_synthesized() {
        let mut columns: Vec<String> = EXPECTED_SCHEMA.iter().map(|c| c.to_string()).collect();
        columns.retain(|c| c != "sku" && c != "discount");
        let mut table = Table::new(columns);
        table.push_row((0..8).map(|i| text(&i.to_string())).collect());

        let added = align_schema(&mut table, &EXPECTED_SCHEMA);

        assert_eq!(added, vec!["sku", "discount"]);
        assert_eq!(table.columns, EXPECTED_SCHEMA.to_vec());
        let sku = table.column_index("sku").unwrap();
        let discount = table.column_index("discount").unwrap();
        assert!(table.column_values(sku).all(Cell::is_null));
        assert!(table.column_values(discount).all(Cell::is_null));
    }

    #[test]
    fn test_reorders_and_keeps_extras_in_order() {
        let mut table = Table::new(vec![
            "zeta".into(),
            "name".into(),
            "alpha".into(),
            "id".into(),
        ]);
        table.push_row(vec![text("z"), text("Lamp"), text("a"), text("1")]);

        align_schema(&mut table, &EXPECTED_SCHEMA);

        assert_eq!(&table.columns[..2], &["id", "name"]);
        assert_eq!(&table.columns[10..], &["zeta", "alpha"]);
        assert_eq!(table.rows[0][0], text("1"));
        assert_eq!(table.rows[0][1], text("Lamp"));
        assert_eq!(table.rows[0][10], text("z"));
        assert_eq!(table.rows[0][11], text("a"));
        assert!(table.rows[0][2..10].iter().all(Cell::is_null));
    }

    #[test]
    fn test_alignment_is_idempotent() {
        let mut table = Table::new(vec!["price".into(), "extra".into()]);
        table.push_row(vec![Cell::Float(1.0), text("x")]);

        align_schema(&mut table, &EXPECTED_SCHEMA);
        let once = table.clone();
        let added = align_schema(&mut table, &EXPECTED_SCHEMA);

        assert!(added.is_empty());
        assert_eq!(table, once);
    }

    #[test]
    fn test_aligned_table_untouched() {
        let mut table = full_table();
        let before = table.clone();

        assert!(align_schema(&mut table, &EXPECTED_SCHEMA).is_empty());
        assert_eq!(table, before);
    }

    #[test]
    fn test_empty_table_gets_header() {
        let mut table = Table::new(vec!["name".into()]);
        let added = align_schema(&mut table, &EXPECTED_SCHEMA);

        assert_eq!(added.len(), 9);
        assert_eq!(table.columns.len(), 10);
        assert!(table.is_empty());
    }
}
