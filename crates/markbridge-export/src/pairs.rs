//! Identifier/mark pairs written into fixed template columns.

use crate::config::PairsTarget;
use crate::error::ExportError;
use crate::region::{check_row_range, clear_span};
use crate::resolver::ensure_sheet;
use markbridge_common::{CellData, CellValue, KeyedPair};
use markbridge_io::{SpreadsheetReader, SpreadsheetWriter, UmyaAdapter};
use std::path::PathBuf;

const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Cell for a mark string.
///
/// Blank writes an empty cell. Integral numbers become integers, other finite
/// numbers stay fractional, and anything else is text with the `@` format so
/// leading zeros and non-numeric marks survive a reopen.
pub fn coerce_mark(mark: &str) -> CellData {
    let mark = mark.trim();
    if mark.is_empty() {
        return CellData::empty();
    }
    match mark.parse::<f64>() {
        Ok(n) if n.is_finite() => {
            if n.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&n) {
                CellData::from_value(CellValue::Int(n as i64))
            } else {
                CellData::from_value(CellValue::Number(n))
            }
        }
        _ => CellData::text(mark),
    }
}

/// Where pairs land in a sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairsLayout {
    pub sheet: String,
    pub start_row: u32,
    pub id_col: u32,
    pub mark_col: u32,
}

impl From<&PairsTarget> for PairsLayout {
    fn from(t: &PairsTarget) -> Self {
        Self {
            sheet: t.sheet.clone(),
            start_row: t.start_row,
            id_col: t.id_col,
            mark_col: t.mark_col,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairsReport {
    /// File that was written; `None` when the writer was not saved.
    pub output: Option<PathBuf>,
    pub rows_cleared: u32,
    pub rows_written: usize,
}

/// Clear both pair columns over the span and write `pairs` from `start_row`.
///
/// Identifiers are always written as text.
pub fn write_pairs<W>(
    writer: &mut W,
    layout: &PairsLayout,
    pairs: &[KeyedPair],
) -> Result<PairsReport, ExportError>
where
    W: SpreadsheetWriter,
    ExportError: From<W::Error>,
{
    if pairs.is_empty() {
        return Err(ExportError::NothingToWrite);
    }
    check_row_range(layout.start_row, pairs.len())?;
    ensure_sheet(writer, &layout.sheet)?;
    let sheet = layout.sheet.as_str();

    let used_rows = writer.sheet_bounds(sheet).map_or(0, |(r, _)| r);
    let span = clear_span(used_rows, layout.start_row, pairs.len());
    for offset in 0..span {
        let row = layout.start_row + offset;
        writer.clear_cell(sheet, row, layout.id_col)?;
        writer.clear_cell(sheet, row, layout.mark_col)?;
    }

    for (row, pair) in (layout.start_row..).zip(pairs) {
        writer.write_cell(sheet, row, layout.id_col, CellData::text(pair.id()))?;
        writer.write_cell(sheet, row, layout.mark_col, coerce_mark(pair.value()))?;
    }

    #[cfg(feature = "tracing")]
    tracing::info!(sheet, pairs = pairs.len(), cleared = span, "wrote pairs");
    Ok(PairsReport {
        output: None,
        rows_cleared: span,
        rows_written: pairs.len(),
    })
}

/// Open the template, write `pairs`, and save the result to the output path.
///
/// The template itself is left unchanged.
pub fn export_pairs_to_workbook(
    target: &PairsTarget,
    pairs: &[KeyedPair],
) -> Result<PairsReport, ExportError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!(
        "export_pairs",
        template = %target.template.display(),
        output = %target.output.display()
    )
    .entered();
    if pairs.is_empty() {
        return Err(ExportError::NothingToWrite);
    }
    if !target.template.is_file() {
        return Err(ExportError::TargetNotFound {
            path: target.template.clone(),
        });
    }

    let mut book = UmyaAdapter::open_path(&target.template)?;
    let mut report = write_pairs(&mut book, &PairsLayout::from(target), pairs)?;
    book.save_as(&target.output)?;
    report.output = Some(target.output.clone());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markbridge_common::NumberFormat;
    use markbridge_io::MemoryAdapter;

    fn layout() -> PairsLayout {
        PairsLayout {
            sheet: "Tab".into(),
            start_row: 1,
            id_col: 1,
            mark_col: 2,
        }
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<KeyedPair> {
        items
            .iter()
            .filter_map(|(id, v)| KeyedPair::new(id, v))
            .collect()
    }

    #[test]
    fn marks_coerce_by_shape() {
        assert_eq!(coerce_mark("70").value, Some(CellValue::Int(70)));
        assert_eq!(coerce_mark(" 70.0 ").value, Some(CellValue::Int(70)));
        assert_eq!(coerce_mark("72.5").value, Some(CellValue::Number(72.5)));
        assert_eq!(coerce_mark("-3").value, Some(CellValue::Int(-3)));
        assert!(coerce_mark("").is_blank());
        assert!(coerce_mark("   ").is_blank());

        let absent = coerce_mark("ABS");
        assert_eq!(absent.value, Some(CellValue::Text("ABS".into())));
        assert_eq!(absent.format, Some(NumberFormat::Text));

        assert!(coerce_mark("inf").is_text_formatted());
        assert!(coerce_mark("NaN").is_text_formatted());
        assert_eq!(coerce_mark("1e30").value, Some(CellValue::Number(1e30)));
    }

    #[test]
    fn ids_are_text_and_stale_rows_cleared() {
        let mut wb = MemoryAdapter::with_sheets(["Tab"]);
        for r in 1..=4 {
            wb.set_row("Tab", r, [Some("old"), Some("0"), Some("notes")])
                .unwrap();
        }
        let input = pairs(&[("007", "70"), ("008", "")]);
        let report = write_pairs(&mut wb, &layout(), &input).unwrap();
        assert_eq!(report.rows_cleared, 4);
        assert_eq!(report.rows_written, 2);

        let id = wb.cell("Tab", 1, 1).unwrap();
        assert_eq!(id.value, Some(CellValue::Text("007".into())));
        assert!(id.is_text_formatted());
        assert_eq!(wb.cell("Tab", 1, 2).unwrap().value, Some(CellValue::Int(70)));
        assert!(wb.cell("Tab", 2, 2).is_none());
        assert!(wb.cell("Tab", 3, 1).is_none());
        assert_eq!(wb.text("Tab", 4, 3), "notes");
    }

    #[test]
    fn empty_pairs_fail_before_any_change() {
        let mut wb = MemoryAdapter::with_sheets(["Tab"]);
        wb.set_row("Tab", 1, [Some("keep")]).unwrap();
        let err = write_pairs(&mut wb, &layout(), &[]).unwrap_err();
        assert!(matches!(err, ExportError::NothingToWrite));
        assert_eq!(wb.text("Tab", 1, 1), "keep");
    }

    #[test]
    fn start_row_must_leave_room_for_every_pair() {
        let mut wb = MemoryAdapter::with_sheets(["Tab"]);
        let input = pairs(&[("1", "10"), ("2", "20")]);

        let mut near_end = layout();
        near_end.start_row = crate::region::MAX_ROW;
        let err = write_pairs(&mut wb, &near_end, &input).unwrap_err();
        assert!(matches!(err, ExportError::RowsOutOfRange { rows: 2, .. }));

        let mut zero = layout();
        zero.start_row = 0;
        let err = write_pairs(&mut wb, &zero, &input).unwrap_err();
        assert!(matches!(err, ExportError::RowsOutOfRange { first_row: 0, .. }));
        assert!(wb.sheet_bounds("Tab").is_none());
    }
}
