//! Column name normalization.
//!
//! Raw headers are lowercased, every run of characters outside `[A-Za-z0-9]`
//! collapses to one underscore, and leading/trailing underscores are stripped.
//! The result is then looked up in a static table of known misspellings and
//! synonyms.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::error::ColumnError;
use crate::models::Table;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("static pattern is valid"));

/// Known header typos and synonyms, keyed by normalized form.
pub static COLUMN_FIXES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("proce", "price"),
        ("descption", "description"),
        ("imageurl", "image_url"),
        ("uaitity", "quantity"),
        ("catgroy", "category"),
        ("categorie", "category"),
        ("img_url", "image_url"),
        ("is_available", "available"),
        ("disponible", "available"),
        ("remise", "discount"),
    ])
});

/// Result of normalizing a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumns {
    /// Canonical names, same length and order as the input.
    pub names: Vec<String>,
    /// `(raw, canonical)` pairs for every header that changed.
    pub renamed: Vec<(String, String)>,
}

/// Lowercase and collapse a header, without the typo lookup.
fn base_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    NON_ALNUM.replace_all(&lowered, "_").trim_matches('_').to_string()
}

/// Normalize a single raw header.
///
/// Returns an empty string if the header contains no ASCII alphanumerics.
/// Spaced variants such as `image url` reach the table through their
/// underscored form.
pub fn normalize_column_name(raw: &str) -> String {
    let base = base_name(raw);
    match COLUMN_FIXES.get(base.as_str()) {
        Some(fixed) => fixed.to_string(),
        None => base,
    }
}

/// Normalize a full header row.
///
/// Headers that normalize to nothing are named `unnamed_<index>`. Two headers
/// landing on the same canonical name are rejected.
pub fn normalize_columns(raw: &[String]) -> Result<NormalizedColumns, ColumnError> {
    let mut names = Vec::with_capacity(raw.len());
    let mut renamed = Vec::new();
    let mut owners: HashMap<String, &str> = HashMap::new();

    for (index, header) in raw.iter().enumerate() {
        let mut name = normalize_column_name(header);
        if name.is_empty() {
            name = format!("unnamed_{}", index);
        }

        if let Some(first) = owners.insert(name.clone(), header.as_str()) {
            return Err(ColumnError::Collision {
                name,
                first: first.to_string(),
                second: header.clone(),
            });
        }

        if &name != header {
            renamed.push((header.clone(), name.clone()));
        }
        names.push(name);
    }

    Ok(NormalizedColumns { names, renamed })
}

/// Rename the table's columns in place; returns the mapping applied.
pub fn normalize_table_columns(table: &mut Table) -> Result<NormalizedColumns, ColumnError> {
    let normalized = normalize_columns(&table.columns)?;
    for (raw, name) in &normalized.renamed {
        tracing::debug!(raw = %raw, name = %name, "renamed column");
    }
    table.columns = normalized.names.clone();
    Ok(normalized)
}
