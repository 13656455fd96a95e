//! Meta crate that re-exports the markbridge layers. Downstream users can
//! depend on this crate and opt into the export pipeline or the paste grid via
//! feature flags while keeping access to the underlying crates.

pub use markbridge_common as common;
pub use markbridge_io as io;

#[cfg(feature = "export")]
pub use markbridge_export as export;

#[cfg(feature = "grid")]
pub use markbridge_grid as grid;

pub use markbridge_common::{
    AssessmentField, CanonicalRow, CellData, CellValue, FieldCatalog, KeyedPair, NumberFormat,
};
pub use markbridge_io::{
    IoError, MemoryAdapter, SpreadsheetReader, SpreadsheetWriter, UmyaAdapter,
};

#[cfg(feature = "export")]
pub use markbridge_export::{
    DiscriminatorFilter, ExportConfig, ExportError, RowAccumulator, coerce_mark,
    export_pairs_to_workbook, export_rows_to_workbook, extract_rows,
};

#[cfg(feature = "grid")]
pub use markbridge_grid::{
    ClipboardSource, Grid, GridConfig, GridSession, KeyedPairStore, MemoryClipboard, Status,
};

#[cfg(feature = "grid")]
pub mod doc_examples;
