//! CSV source reader with UTF-8 byte-order-mark tolerance.
//!
//! Converts comma-delimited bytes into a [`Table`] of raw text cells. No
//! catalog-specific logic here: headers are returned exactly as written and
//! every non-empty field is kept as [`Cell::Text`].

use std::path::Path;

use encoding_rs::UTF_8;

use crate::error::{CsvError, CsvResult};
use crate::models::{Cell, Table};

/// Strip a UTF-8 byte-order mark and validate the remaining bytes.
///
/// A UTF-16 byte-order mark is rejected: only UTF-8 input is supported.
pub fn decode_content(bytes: &[u8]) -> CsvResult<String> {
    let body = match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == UTF_8 => &bytes[bom_len..],
        Some((encoding, _)) => {
            return Err(CsvError::Encoding(format!(
                "unsupported encoding {}",
                encoding.name()
            )))
        }
        None => bytes,
    };

    UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|content| content.into_owned())
        .ok_or_else(|| CsvError::Encoding("invalid byte sequence".to_string()))
}

/// Parse CSV content into a raw table.
///
/// The first record is the header row. Rows shorter than the header are
/// padded with nulls; longer rows are a parse error. Empty fields become
/// [`Cell::Null`]; everything else is kept verbatim, whitespace included.
///
/// # Example
/// ```ignore
/// use catalog_cleaner::parser::parse_str;
///
/// let table = parse_str("id,name\n1,Lamp\n").unwrap();
/// assert_eq!(table.columns, vec!["id", "name"]);
/// assert_eq!(table.len(), 1);
/// ```
pub fn parse_str(content: &str) -> CsvResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let width = headers.len();
    let mut table = Table::new(headers);

    for result in reader.records() {
        let record = result?;

        // Blank line
        if record.is_empty() || (record.len() == 1 && record[0].is_empty() && width > 1) {
            continue;
        }

        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(CsvError::Parse {
                line,
                message: format!("expected {} fields, found {}", width, record.len()),
            });
        }

        table.push_row(record.iter().map(Cell::from_field).collect());
    }

    Ok(table)
}

/// Parse CSV bytes, tolerating a leading UTF-8 byte-order mark.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<Table> {
    let content = decode_content(bytes)?;
    parse_str(&content)
}

/// Parse a CSV file from disk.
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}
