//! Tabular extraction and header-resolved region writes.
//!
//! The pipeline reads delimited exports, keeps the records whose first field
//! is the discriminator token, maps them through a [`FieldCatalog`], and writes
//! them into the region below a template's header row, matching columns by
//! header text. Identifier/mark pairs are exported into fixed columns with
//! numeric coercion of the mark.

pub mod config;
pub mod error;
pub mod filter;
pub mod pairs;
pub mod region;
pub mod resolver;

pub use config::{ExportConfig, PairsTarget, RegionTarget};
pub use error::ExportError;
pub use filter::{
    DEFAULT_DISCRIMINATOR, DiscriminatorFilter, LoadReport, RowAccumulator, RowSummary,
    extract_rows, summarize,
};
pub use pairs::{PairsLayout, PairsReport, coerce_mark, export_pairs_to_workbook, write_pairs};
pub use region::{
    ExportSummary, RegionReport, TargetRegion, clear_span, export_rows_to_workbook, write_region,
};
pub use resolver::{ColumnResolution, ShadowedHeader, resolve_columns};

// Re-export for convenience
pub use markbridge_common::{AssessmentField, CanonicalRow, FieldCatalog, KeyedPair};
