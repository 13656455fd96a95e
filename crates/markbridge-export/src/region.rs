//! Header-resolved region writes.
//!
//! A write clears every resolved column over
//! `max(used_rows - first_data_row + 1, rows.len())` rows, then writes one
//! row per [`CanonicalRow`]. Columns outside the resolution are never touched,
//! so re-running with fewer rows leaves nothing stale behind.

use crate::config::RegionTarget;
use crate::error::ExportError;
use crate::resolver::{ColumnResolution, ShadowedHeader, ensure_sheet, resolve_columns};
use markbridge_common::{CanonicalRow, CellData, FieldCatalog};
use markbridge_io::{SpreadsheetReader, SpreadsheetWriter, UmyaAdapter};
use std::path::PathBuf;

/// Last row of an xlsx worksheet.
pub const MAX_ROW: u32 = 1_048_576;

/// Number of rows the clear phase covers.
pub fn clear_span(used_rows: u32, first_data_row: u32, rows_to_write: usize) -> u32 {
    let stale = used_rows.saturating_add(1).saturating_sub(first_data_row);
    let incoming = u32::try_from(rows_to_write).unwrap_or(u32::MAX);
    stale.max(incoming)
}

/// `rows` rows starting at `first_row` must lie within `1..=MAX_ROW`.
pub(crate) fn check_row_range(first_row: u32, rows: usize) -> Result<(), ExportError> {
    let out_of_range = || ExportError::RowsOutOfRange { first_row, rows };
    let last_offset = u32::try_from(rows.saturating_sub(1)).map_err(|_| out_of_range())?;
    match first_row.checked_add(last_offset) {
        Some(last) if first_row >= 1 && last <= MAX_ROW => Ok(()),
        _ => Err(out_of_range()),
    }
}

/// The cells a region write may clear and rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetRegion {
    pub sheet: String,
    pub header_row: u32,
    pub first_data_row: u32,
    /// Resolved columns, ascending.
    pub columns: Vec<u32>,
}

impl TargetRegion {
    pub fn new(sheet: &str, resolution: &ColumnResolution, first_data_row: u32) -> Self {
        Self {
            sheet: sheet.to_string(),
            header_row: resolution.header_row(),
            first_data_row,
            columns: resolution.columns().keys().copied().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionReport {
    pub region: TargetRegion,
    pub rows_cleared: u32,
    pub rows_written: usize,
    pub shadowed: Vec<ShadowedHeader>,
}

/// Clear and rewrite the resolved region of `sheet`.
///
/// Empty input fails with [`ExportError::NothingToWrite`] before anything is
/// touched, as does a first data row at or above the header row or a span
/// that runs past [`MAX_ROW`].
pub fn write_region<W>(
    writer: &mut W,
    sheet: &str,
    resolution: &ColumnResolution,
    first_data_row: u32,
    rows: &[CanonicalRow],
) -> Result<RegionReport, ExportError>
where
    W: SpreadsheetWriter,
    ExportError: From<W::Error>,
{
    if rows.is_empty() {
        return Err(ExportError::NothingToWrite);
    }
    if first_data_row <= resolution.header_row() {
        return Err(ExportError::DataOverlapsHeader {
            header_row: resolution.header_row(),
            first_data_row,
        });
    }
    check_row_range(first_data_row, rows.len())?;
    ensure_sheet(writer, sheet)?;

    let region = TargetRegion::new(sheet, resolution, first_data_row);
    let used_rows = writer.sheet_bounds(sheet).map_or(0, |(r, _)| r);
    let span = clear_span(used_rows, first_data_row, rows.len());

    #[cfg(feature = "tracing")]
    tracing::debug!(sheet, used_rows, span, columns = region.columns.len(), "clearing region");
    for offset in 0..span {
        let row = first_data_row + offset;
        for &col in &region.columns {
            writer.clear_cell(sheet, row, col)?;
        }
    }

    for (row, canonical) in (first_data_row..).zip(rows) {
        for (col, name) in resolution.iter() {
            let value = canonical.get(name).unwrap_or_default().trim();
            writer.write_cell(sheet, row, col, CellData::from_value(value))?;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::info!(sheet, rows = rows.len(), "wrote region");
    Ok(RegionReport {
        region,
        rows_cleared: span,
        rows_written: rows.len(),
        shadowed: resolution.shadowed().to_vec(),
    })
}

/// Result of an export that was saved to disk.
#[derive(Clone, Debug)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub report: RegionReport,
}

/// Write `rows` into the configured region of an existing workbook and save
/// it in place.
pub fn export_rows_to_workbook(
    target: &RegionTarget,
    catalog: &FieldCatalog,
    rows: &[CanonicalRow],
) -> Result<ExportSummary, ExportError> {
    #[cfg(feature = "tracing")]
    let _span =
        tracing::info_span!("export_rows", path = %target.workbook.display(), sheet = %target.sheet)
            .entered();
    if rows.is_empty() {
        return Err(ExportError::NothingToWrite);
    }
    if !target.workbook.is_file() {
        return Err(ExportError::TargetNotFound {
            path: target.workbook.clone(),
        });
    }

    let mut book = UmyaAdapter::open_path(&target.workbook)?;
    let resolution = resolve_columns(&mut book, &target.sheet, target.header_row, catalog)?;
    let report = write_region(
        &mut book,
        &target.sheet,
        &resolution,
        target.first_data_row,
        rows,
    )?;
    book.save()?;

    Ok(ExportSummary {
        path: target.workbook.clone(),
        report,
    })
}
