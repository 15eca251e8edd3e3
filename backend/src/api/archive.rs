//! ZIP packaging of cleaning results.

use std::io::{Cursor, Write};

use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Name of the cleaned table inside the archive.
pub const CLEAN_CSV_ENTRY: &str = "clean.csv";
/// Name of the report inside the archive.
pub const REPORT_ENTRY: &str = "report.json";

/// Build a deflated archive holding `clean.csv` and `report.json`.
pub fn build_result_zip(clean_csv: &[u8], report_json: &str) -> ZipResult<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file(CLEAN_CSV_ENTRY, options)?;
        zip.write_all(clean_csv)?;

        zip.start_file(REPORT_ENTRY, options)?;
        zip.write_all(report_json.as_bytes())?;

        zip.finish()?;
    }
    Ok(buffer)
}
