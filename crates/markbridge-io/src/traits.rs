use markbridge_common::CellData;
use std::collections::BTreeMap;
use std::path::Path;

/// Where a writer should persist its workbook.
pub enum SaveDestination<'a> {
    /// Overwrite the file the workbook was opened from.
    InPlace,
    Path(&'a Path),
    Bytes,
}

/// Read access to a workbook made of named worksheets.
///
/// Rows and columns are 1-based throughout.
pub trait SpreadsheetReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn has_sheet(&self, sheet: &str) -> Result<bool, Self::Error> {
        Ok(self.sheet_names()?.iter().any(|s| s == sheet))
    }

    fn read_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
    ) -> Result<Option<CellData>, Self::Error> {
        // Default: fallback to row read
        let mut cells = self.read_row(sheet, row)?;
        Ok(cells.remove(&col))
    }

    /// Non-empty cells of one row keyed by column.
    fn read_row(&mut self, sheet: &str, row: u32) -> Result<BTreeMap<u32, CellData>, Self::Error>;

    /// `(max_row, max_col)` over stored cells, `None` for a missing or empty sheet.
    fn sheet_bounds(&self, sheet: &str) -> Option<(u32, u32)>;
}

pub trait SpreadsheetWriter: SpreadsheetReader {
    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        data: CellData,
    ) -> Result<(), Self::Error>;

    fn clear_cell(&mut self, sheet: &str, row: u32, col: u32) -> Result<(), Self::Error> {
        self.write_cell(sheet, row, col, CellData::empty())
    }

    fn save_to<'a>(&mut self, dest: SaveDestination<'a>) -> Result<Option<Vec<u8>>, Self::Error>;

    fn save(&mut self) -> Result<(), Self::Error> {
        self.save_to(SaveDestination::InPlace).map(|_| ())
    }

    fn save_as(&mut self, path: &Path) -> Result<(), Self::Error> {
        self.save_to(SaveDestination::Path(path)).map(|_| ())
    }

    fn save_to_bytes(&mut self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.save_to(SaveDestination::Bytes)?.unwrap_or_default())
    }
}
