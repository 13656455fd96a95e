#![cfg(feature = "umya")]

use crate::error::IoError;
use crate::traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter};
use markbridge_common::{CellData, CellValue, NumberFormat};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Cell, CellRawValue, Spreadsheet, reader::xlsx};

/// xlsx backend over `umya-spreadsheet`.
///
/// The workbook is read fully on open so that saving never trips over
/// sheets that were never deserialized.
pub struct UmyaAdapter {
    workbook: RwLock<Spreadsheet>,
    original_path: Option<PathBuf>,
}

impl UmyaAdapter {
    /// Fresh workbook with the default `Sheet1`, not yet backed by a file.
    pub fn new() -> Self {
        Self {
            workbook: RwLock::new(umya_spreadsheet::new_file()),
            original_path: None,
        }
    }

    fn convert_cell(cell: &Cell) -> Option<CellData> {
        let cv = cell.get_cell_value();
        let raw = cv.get_raw_value();
        let value = if raw.is_empty() {
            None
        } else {
            match raw {
                CellRawValue::Numeric(n) => Some(CellValue::Number(*n)),
                CellRawValue::Bool(b) => Some(CellValue::Boolean(*b)),
                CellRawValue::String(s) => Some(CellValue::Text(s.to_string())),
                CellRawValue::RichText(rt) => Some(CellValue::Text(rt.get_text().to_string())),
                CellRawValue::Lazy(s) => {
                    let txt: &str = s.as_ref();
                    match txt.parse::<f64>() {
                        Ok(n) => Some(CellValue::Number(n)),
                        Err(_) => Some(CellValue::Text(txt.to_string())),
                    }
                }
                // Error cells surface as their display text (`#N/A`, ...).
                CellRawValue::Error(_) => Some(CellValue::Text(cv.get_value().to_string())),
                CellRawValue::Empty => None,
            }
        };
        let format = cell
            .get_style()
            .get_number_format()
            .map(|nf| NumberFormat::from_code(nf.get_format_code()))
            .filter(|f| *f != NumberFormat::General);
        if value.is_none() && format.is_none() {
            return None;
        }
        Some(CellData { value, format })
    }

    fn serialize(&self) -> Result<Vec<u8>, IoError> {
        let mut wb = self.workbook.write();
        // Force deserialize each sheet explicitly before writing
        let count = wb.get_sheet_count();
        for i in 0..count {
            wb.read_sheet(i);
        }
        let mut buf = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&*wb, &mut buf)
            .map_err(|e| IoError::from_backend("umya", e))?;
        Ok(buf.into_inner())
    }
}

impl Default for UmyaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetReader for UmyaAdapter {
    type Error = IoError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        // Need write lock to deserialize sheets lazily
        let mut wb = self.workbook.write();
        let count = wb.get_sheet_count();
        let mut names = Vec::with_capacity(count);
        for i in 0..count {
            wb.read_sheet(i);
            if let Some(s) = wb.get_sheet(&i) {
                names.push(s.get_name().to_string());
            }
        }
        Ok(names)
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("umya_open", path = %path.as_ref().display()).entered();
        let book = xlsx::read(path.as_ref()).map_err(|e| IoError::from_backend("umya", e))?;
        Ok(Self {
            workbook: RwLock::new(book),
            original_path: Some(path.as_ref().to_path_buf()),
        })
    }

    fn read_row(&mut self, sheet: &str, row: u32) -> Result<BTreeMap<u32, CellData>, Self::Error> {
        let wb = self.workbook.read();
        let ws = wb.get_sheet_by_name(sheet).ok_or_else(|| IoError::SheetNotFound {
            sheet: sheet.to_string(),
        })?;
        let mut out = BTreeMap::new();
        for cell in ws.get_cell_collection() {
            let coord = cell.get_coordinate();
            if *coord.get_row_num() != row {
                continue;
            }
            if let Some(data) = Self::convert_cell(cell) {
                out.insert(*coord.get_col_num(), data);
            }
        }
        Ok(out)
    }

    fn sheet_bounds(&self, sheet: &str) -> Option<(u32, u32)> {
        let wb = self.workbook.read();
        let ws = wb.get_sheet_by_name(sheet)?;
        let (max_r, max_c) = ws.get_cell_collection().iter().fold((0u32, 0u32), |acc, cell| {
            let coord = cell.get_coordinate();
            (acc.0.max(*coord.get_row_num()), acc.1.max(*coord.get_col_num()))
        });
        if max_r == 0 || max_c == 0 {
            None
        } else {
            Some((max_r, max_c))
        }
    }
}

impl SpreadsheetWriter for UmyaAdapter {
    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        data: CellData,
    ) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        let ws = wb
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| IoError::SheetNotFound {
                sheet: sheet.to_string(),
            })?;
        // umya uses (col,row)
        let cell = ws.get_cell_mut((col, row));
        match data.value {
            Some(CellValue::Number(n)) => {
                cell.set_value_number(n);
            }
            Some(CellValue::Int(i)) => {
                cell.set_value_number(i as f64);
            }
            Some(CellValue::Boolean(b)) => {
                cell.set_value_bool(b);
            }
            Some(CellValue::Text(s)) => {
                cell.set_value_string(s);
            }
            Some(CellValue::Empty) | None => {
                cell.set_blank();
            }
        }
        if let Some(format) = data.format {
            cell.get_style_mut()
                .get_number_format_mut()
                .set_format_code(format.code());
        }
        Ok(())
    }

    fn save_to<'a>(&mut self, dest: SaveDestination<'a>) -> Result<Option<Vec<u8>>, Self::Error> {
        match dest {
            SaveDestination::InPlace => {
                let path = self.original_path.clone().ok_or_else(|| IoError::Backend {
                    backend: "umya".to_string(),
                    message: "InPlace save unavailable: no original path".to_string(),
                })?;
                std::fs::write(path, self.serialize()?)?;
                Ok(None)
            }
            SaveDestination::Path(p) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %p.display(), "saving workbook");
                std::fs::write(p, self.serialize()?)?;
                Ok(None)
            }
            SaveDestination::Bytes => Ok(Some(self.serialize()?)),
        }
    }
}

