//! Whitespace trimming for text cells.

use crate::models::{Cell, Table};

/// Trim leading and trailing whitespace from every text cell.
///
/// Non-text cells are untouched; a whitespace-only string becomes an empty
/// string, never a null. Returns the number of cells that changed.
pub fn trim_text_cells(table: &mut Table) -> usize {
    let mut changed = 0;
    for cell in table.rows.iter_mut().flat_map(|row| row.iter_mut()) {
        if let Cell::Text(s) = cell {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
                changed += 1;
            }
        }
    }
    changed
}
