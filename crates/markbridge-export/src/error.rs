use markbridge_io::{IoError, SourceReadError};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("error reading source {0}")]
    SourceRead(#[from] SourceReadError),

    #[error(
        "could not match any headers on row {header_row} of '{sheet}' to catalog fields \
         (found: {found:?}; catalog: {catalog:?})"
    )]
    NoHeaderMatch {
        sheet: String,
        header_row: u32,
        /// Non-empty header text that was scanned.
        found: Vec<String>,
        catalog: Vec<String>,
    },

    #[error("worksheet '{sheet}' not found. Available: {available:?}")]
    WorksheetNotFound { sheet: String, available: Vec<String> },

    #[error("first data row {first_data_row} must be below header row {header_row}")]
    DataOverlapsHeader { header_row: u32, first_data_row: u32 },

    #[error("{rows} rows from row {first_row} run past the last worksheet row")]
    RowsOutOfRange { first_row: u32, rows: usize },

    #[error("target workbook not found: {}", path.display())]
    TargetNotFound { path: PathBuf },

    #[error("no rows to export")]
    NothingToWrite,

    #[error(transparent)]
    Io(#[from] IoError),
}
