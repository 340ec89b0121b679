//! File ingestion: one `RawRow` source with two implementations.
//!
//! Both formats yield the same header-to-cell row shape, selected by a
//! format discriminator derived from the file extension. Malformed input
//! aborts the whole upload - there is no partial success.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use taskdist_core::RawRow;

/// Upload file format, chosen solely by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// Delimited text, stream-parsed; header row names the fields.
    Csv,
    /// Excel workbook; first sheet only, first row as headers.
    Workbook,
}

impl UploadFormat {
    /// Resolve the format from a file name. Returns `None` for any
    /// extension outside `.csv` / `.xlsx` / `.xls`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Ingestion failures. All of these abort the upload.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed CSV stream.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// Unreadable or corrupt workbook file.
    #[error("workbook read error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Workbook contains no sheets.
    #[error("workbook has no sheets")]
    NoSheet,
}

/// Read the uploaded file into an ordered sequence of raw rows.
pub fn read_rows(path: &Path, format: UploadFormat) -> Result<Vec<RawRow>, IngestError> {
    match format {
        UploadFormat::Csv => read_csv(path),
        UploadFormat::Workbook => read_workbook(path),
    }
}

fn read_csv(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let mut workbook = open_workbook_auto(path)?;
    // First sheet only; later sheets are ignored.
    let range = workbook.worksheet_range_at(0).ok_or(IngestError::NoSheet)??;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();

    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        // Empty cells are omitted from the row, and fully empty rows are
        // skipped, matching how the workbook is sparsely stored.
        let row: RawRow = headers
            .iter()
            .zip(sheet_row.iter())
            .filter(|(_, cell)| !matches!(cell, Data::Empty))
            .map(|(h, cell)| (h.clone(), cell_to_string(cell)))
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Render a workbook cell as the string the validator sees.
///
/// Spreadsheet tools routinely store a 10-digit phone as a float; an
/// integral float must come out as "5551234567", not "5551234567.0".
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string(),
    }
}
