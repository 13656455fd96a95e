use crate::error::{IoError, with_cell_context};
use crate::traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter};
use markbridge_common::{CellData, CellValue};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Debug, Default)]
struct MemorySheet {
    /// Only non-empty cells are stored.
    cells: BTreeMap<(u32, u32), CellData>,
    /// Maximum row index ever written (1-based).
    max_row: u32,
    /// Maximum column index ever written (1-based).
    max_col: u32,
}

impl MemorySheet {
    fn bounds(&self) -> Option<(u32, u32)> {
        if self.max_row == 0 || self.max_col == 0 {
            None
        } else {
            Some((self.max_row, self.max_col))
        }
    }

    fn set_bounds(&mut self, rows: u32, cols: u32) {
        self.max_row = self.max_row.max(rows);
        self.max_col = self.max_col.max(cols);
    }
}

/// Workbook held entirely in memory.
///
/// Semantics:
/// - Sheets keep their creation order.
/// - Like a saved xlsx, bounds grow with every write and never shrink when
///   cells are cleared.
/// - There is no file format; only in-place saves (a no-op) are accepted.
#[derive(Clone, Debug, Default)]
pub struct MemoryAdapter {
    sheets: Vec<(String, MemorySheet)>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given sheets, all empty.
    pub fn with_sheets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sheets: names
                .into_iter()
                .map(|n| (n.into(), MemorySheet::default()))
                .collect(),
        }
    }

    /// Fill a row from `col = 1` onwards; `None` entries leave the cell empty.
    pub fn set_row<V: Into<CellValue>>(
        &mut self,
        sheet: &str,
        row: u32,
        values: impl IntoIterator<Item = Option<V>>,
    ) -> Result<(), IoError> {
        for (i, value) in values.into_iter().enumerate() {
            if let Some(v) = value {
                self.write_cell(
                    sheet,
                    row,
                    (i as u32) + 1,
                    CellData {
                        value: Some(v.into()),
                        format: None,
                    },
                )?;
            }
        }
        Ok(())
    }

    /// Stored cell (value and format) without going through the reader trait.
    pub fn cell(&self, sheet: &str, row: u32, col: u32) -> Option<&CellData> {
        self.sheet(sheet)?.cells.get(&(row, col))
    }

    /// Display text of a cell, empty when unset.
    pub fn text(&self, sheet: &str, row: u32, col: u32) -> String {
        self.cell(sheet, row, col)
            .map(CellData::display_text)
            .unwrap_or_default()
    }

    fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    fn sheet_mut(&mut self, name: &str) -> Option<&mut MemorySheet> {
        self.sheets
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }
}

impl SpreadsheetReader for MemoryAdapter {
    type Error = IoError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.sheets.iter().map(|(n, _)| n.clone()).collect())
    }

    fn open_path<P: AsRef<Path>>(_path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Err(IoError::Unsupported {
            feature: "open_path".to_string(),
            context: "memory".to_string(),
        })
    }

    fn read_row(&mut self, sheet: &str, row: u32) -> Result<BTreeMap<u32, CellData>, Self::Error> {
        let Some(s) = self.sheet(sheet) else {
            return Err(IoError::SheetNotFound {
                sheet: sheet.to_string(),
            });
        };
        Ok(s.cells
            .range((row, 0)..=(row, u32::MAX))
            .map(|((_, c), d)| (*c, d.clone()))
            .collect())
    }

    fn sheet_bounds(&self, sheet: &str) -> Option<(u32, u32)> {
        self.sheet(sheet).and_then(MemorySheet::bounds)
    }
}

impl SpreadsheetWriter for MemoryAdapter {
    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        data: CellData,
    ) -> Result<(), Self::Error> {
        if row == 0 || col == 0 {
            let err = IoError::from_backend("memory", "cell coordinates are 1-based");
            return with_cell_context(Err(err), sheet, row, col);
        }
        let Some(s) = self.sheet_mut(sheet) else {
            return Err(IoError::SheetNotFound {
                sheet: sheet.to_string(),
            });
        };
        s.set_bounds(row, col);
        match data.value {
            None | Some(CellValue::Empty) if data.format.is_none() => {
                s.cells.remove(&(row, col));
            }
            _ => {
                s.cells.insert((row, col), data);
            }
        }
        Ok(())
    }

    fn save_to<'a>(&mut self, dest: SaveDestination<'a>) -> Result<Option<Vec<u8>>, Self::Error> {
        match dest {
            SaveDestination::InPlace => Ok(None),
            _ => Err(IoError::Unsupported {
                feature: "saving to a file format".to_string(),
                context: "memory".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_read_back_sparse() {
        let mut wb = MemoryAdapter::with_sheets(["Data"]);
        wb.set_row("Data", 2, [Some("a"), None, Some("c")]).unwrap();
        let row = wb.read_row("Data", 2).unwrap();
        assert_eq!(row.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert!(wb.read_row("Data", 1).unwrap().is_empty());
    }

    #[test]
    fn zero_coordinates_are_rejected_with_address() {
        let mut wb = MemoryAdapter::with_sheets(["Data"]);
        let err = wb.write_cell("Data", 0, 2, CellData::from_value(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "Data!R0C2: memory: cell coordinates are 1-based");
    }

    #[test]
    fn clearing_keeps_bounds() {
        let mut wb = MemoryAdapter::with_sheets(["Data"]);
        wb.write_cell("Data", 5, 2, CellData::from_value("x")).unwrap();
        wb.clear_cell("Data", 5, 2).unwrap();
        assert!(wb.cell("Data", 5, 2).is_none());
        assert_eq!(wb.sheet_bounds("Data"), Some((5, 2)));
    }

    #[test]
    fn missing_sheet_is_reported() {
        let mut wb = MemoryAdapter::with_sheets(["Data"]);
        let err = wb.write_cell("Other", 1, 1, CellData::empty()).unwrap_err();
        assert!(matches!(err, IoError::SheetNotFound { sheet } if sheet == "Other"));
        assert_eq!(wb.sheet_bounds("Other"), None);
    }

    #[test]
    fn text_format_is_kept() {
        let mut wb = MemoryAdapter::with_sheets(["Data"]);
        wb.write_cell("Data", 1, 1, CellData::text("007")).unwrap();
        let cell = wb.read_cell("Data", 1, 1).unwrap().unwrap();
        assert!(cell.is_text_formatted());
        assert_eq!(cell.display_text(), "007");
    }
}
