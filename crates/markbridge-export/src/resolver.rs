//! Header-row column resolution.

use crate::error::ExportError;
use markbridge_common::FieldCatalog;
use markbridge_io::SpreadsheetReader;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// A header that matched a canonical field already claimed by an earlier
/// column. The later column wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShadowedHeader {
    pub canonical: String,
    pub kept_col: u32,
    pub dropped_col: u32,
}

/// Column index (1-based) to canonical field name for one header row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnResolution {
    header_row: u32,
    columns: BTreeMap<u32, String>,
    shadowed: Vec<ShadowedHeader>,
}

impl ColumnResolution {
    /// Match `(column, header text)` cells against the catalog.
    ///
    /// Blank headers and headers with no catalog match are left out.
    pub fn from_headers<'a, I>(header_row: u32, headers: I, catalog: &FieldCatalog) -> Self
    where
        I: IntoIterator<Item = (u32, &'a str)>,
    {
        let mut columns = BTreeMap::new();
        let mut claimed: FxHashMap<String, u32> = FxHashMap::default();
        let mut shadowed = Vec::new();

        for (col, text) in headers {
            let Some(field) = catalog.lookup_header(text) else {
                continue;
            };
            if let Some(prev) = claimed.insert(field.name.clone(), col) {
                columns.remove(&prev);
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    field = %field.name,
                    dropped_col = prev,
                    kept_col = col,
                    "duplicate header; later column wins"
                );
                shadowed.push(ShadowedHeader {
                    canonical: field.name.clone(),
                    kept_col: col,
                    dropped_col: prev,
                });
            }
            columns.insert(col, field.name.clone());
        }

        Self {
            header_row,
            columns,
            shadowed,
        }
    }

    pub fn header_row(&self) -> u32 {
        self.header_row
    }

    pub fn columns(&self) -> &BTreeMap<u32, String> {
        &self.columns
    }

    pub fn shadowed(&self) -> &[ShadowedHeader] {
        &self.shadowed
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn column_of(&self, canonical: &str) -> Option<u32> {
        self.columns
            .iter()
            .find_map(|(col, name)| (name == canonical).then_some(*col))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.columns.iter().map(|(c, n)| (*c, n.as_str()))
    }
}

/// Scan `header_row` of `sheet` and resolve its columns.
///
/// Fails with [`ExportError::WorksheetNotFound`] for an unknown sheet and
/// [`ExportError::NoHeaderMatch`] when no header matches.
pub fn resolve_columns<R>(
    reader: &mut R,
    sheet: &str,
    header_row: u32,
    catalog: &FieldCatalog,
) -> Result<ColumnResolution, ExportError>
where
    R: SpreadsheetReader,
    ExportError: From<R::Error>,
{
    ensure_sheet(reader, sheet)?;
    let cells = reader.read_row(sheet, header_row)?;
    let texts: Vec<(u32, String)> = cells
        .iter()
        .map(|(col, data)| (*col, data.display_text().trim().to_string()))
        .filter(|(_, text)| !text.is_empty())
        .collect();

    let resolution = ColumnResolution::from_headers(
        header_row,
        texts.iter().map(|(c, t)| (*c, t.as_str())),
        catalog,
    );

    if resolution.is_empty() {
        return Err(ExportError::NoHeaderMatch {
            sheet: sheet.to_string(),
            header_row,
            found: texts.into_iter().map(|(_, t)| t).collect(),
            catalog: catalog.names().map(str::to_string).collect(),
        });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(sheet, header_row, matched = resolution.len(), "resolved header row");
    Ok(resolution)
}

pub(crate) fn ensure_sheet<R>(reader: &R, sheet: &str) -> Result<(), ExportError>
where
    R: SpreadsheetReader,
    ExportError: From<R::Error>,
{
    let available = reader.sheet_names()?;
    if available.iter().any(|s| s == sheet) {
        Ok(())
    } else {
        Err(ExportError::WorksheetNotFound {
            sheet: sheet.to_string(),
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markbridge_io::MemoryAdapter;

    fn catalog() -> FieldCatalog {
        FieldCatalog::new([(0, "StudentID"), (1, "Mark"), (2, "Barcode")]).unwrap()
    }

    #[test]
    fn matches_ignore_case_and_whitespace() {
        let mut wb = MemoryAdapter::with_sheets(["Out"]);
        wb.set_row(
            "Out",
            2,
            [Some("  studentid "), Some("Notes"), None, Some("MARK")],
        )
        .unwrap();
        let res = resolve_columns(&mut wb, "Out", 2, &catalog()).unwrap();
        let cols: Vec<_> = res.iter().collect();
        assert_eq!(cols, vec![(1, "StudentID"), (4, "Mark")]);
        assert_eq!(res.header_row(), 2);
        assert!(res.shadowed().is_empty());
    }

    #[test]
    fn later_duplicate_header_wins() {
        let res = ColumnResolution::from_headers(
            1,
            [(1, "Mark"), (2, "StudentID"), (5, "mark")],
            &catalog(),
        );
        assert_eq!(res.column_of("Mark"), Some(5));
        assert_eq!(res.len(), 2);
        assert_eq!(
            res.shadowed(),
            &[ShadowedHeader {
                canonical: "Mark".into(),
                kept_col: 5,
                dropped_col: 1,
            }]
        );
    }

    #[test]
    fn aliases_resolve_to_canonical_name() {
        let catalog = catalog().with_alias("Student Number", "StudentID").unwrap();
        let res = ColumnResolution::from_headers(1, [(3, "student number")], &catalog);
        assert_eq!(res.column_of("StudentID"), Some(3));
    }

    #[test]
    fn no_match_lists_found_and_catalog() {
        let mut wb = MemoryAdapter::with_sheets(["Out"]);
        wb.set_row("Out", 1, [Some("Name"), Some(" ")]).unwrap();
        let err = resolve_columns(&mut wb, "Out", 1, &catalog()).unwrap_err();
        match err {
            ExportError::NoHeaderMatch {
                header_row,
                found,
                catalog,
                ..
            } => {
                assert_eq!(header_row, 1);
                assert_eq!(found, vec!["Name".to_string()]);
                assert_eq!(catalog, vec!["StudentID", "Mark", "Barcode"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_sheet_lists_available() {
        let mut wb = MemoryAdapter::with_sheets(["Out", "Notes"]);
        let err = resolve_columns(&mut wb, "out", 1, &catalog()).unwrap_err();
        match err {
            ExportError::WorksheetNotFound { sheet, available } => {
                assert_eq!(sheet, "out");
                assert_eq!(available, vec!["Out".to_string(), "Notes".into()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
