//! Fixture builders shared by the markbridge test suites.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A file inside a temporary directory that lives as long as the fixture.
pub struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

impl Fixture {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for Fixture {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Build an xlsx workbook with `umya-spreadsheet` and write it to a temp file.
///
/// The book starts with the default `Sheet1`.
pub fn build_workbook(f: impl FnOnce(&mut umya_spreadsheet::Spreadsheet)) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fixture.xlsx");
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write xlsx fixture");
    Fixture { _dir: dir, path }
}

/// Workbook with one named sheet whose `header_row` holds `headers` from column A.
pub fn build_template(sheet: &str, header_row: u32, headers: &[&str]) -> Fixture {
    build_workbook(|book| {
        let ws = book
            .get_sheet_by_name_mut("Sheet1")
            .expect("default sheet");
        ws.set_name(sheet);
        for (i, h) in headers.iter().enumerate() {
            ws.get_cell_mut(((i as u32) + 1, header_row))
                .set_value_string(*h);
        }
    })
}

/// Write `contents` verbatim to a temp file named `name`.
pub fn write_source(name: &str, contents: &[u8]) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write source fixture");
    Fixture { _dir: dir, path }
}

/// A temp directory with a path inside it that does not exist yet.
pub fn scratch_path(name: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    Fixture { _dir: dir, path }
}

/// Read one cell's display value from an xlsx file on disk.
pub fn read_cell_text(path: &Path, sheet: &str, col: u32, row: u32) -> String {
    let book = umya_spreadsheet::reader::xlsx::read(path).expect("read xlsx");
    let ws = book.get_sheet_by_name(sheet).expect("sheet");
    ws.get_cell((col, row))
        .map(|c| c.get_value().to_string())
        .unwrap_or_default()
}
