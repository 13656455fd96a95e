//! Discriminator row filter.
//!
//! A record is kept only when its first field, trimmed and uppercased, equals
//! the discriminator token exactly. Suffixed variants (`SSPASSESSHIST`) and
//! header/format records are dropped. Kept records are mapped through the
//! catalog into [`CanonicalRow`]s.

use crate::error::ExportError;
use markbridge_common::{AssessmentField, CanonicalRow, FieldCatalog};
use markbridge_io::{DelimitedSource, SourceReadError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_DISCRIMINATOR: &str = "SSPASSESS";

#[derive(Clone, Debug)]
pub struct DiscriminatorFilter {
    catalog: Arc<FieldCatalog>,
    token: String,
}

impl DiscriminatorFilter {
    pub fn new(catalog: Arc<FieldCatalog>, token: &str) -> Self {
        Self {
            catalog,
            token: token.trim().to_uppercase(),
        }
    }

    /// Assessment catalog with the `SSPASSESS` token.
    pub fn assessment() -> Self {
        Self::new(Arc::new(FieldCatalog::assessment()), DEFAULT_DISCRIMINATOR)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn catalog(&self) -> &Arc<FieldCatalog> {
        &self.catalog
    }

    pub fn accepts<S: AsRef<str>>(&self, record: &[S]) -> bool {
        record
            .first()
            .is_some_and(|first| first.as_ref().trim().to_uppercase() == self.token)
    }

    pub fn map<S: AsRef<str>>(&self, record: &[S]) -> Option<CanonicalRow> {
        self.accepts(record)
            .then(|| CanonicalRow::from_record(Arc::clone(&self.catalog), record))
    }

    /// Lazily filter and map in-memory records.
    pub fn rows<I, R, S>(&self, records: I) -> impl Iterator<Item = CanonicalRow>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        records.into_iter().filter_map(|r| self.map(r.as_ref()))
    }

    /// Like [`rows`](Self::rows) over fallible records; errors pass through
    /// in position.
    pub fn try_rows<I, R, S, E>(&self, records: I) -> impl Iterator<Item = Result<CanonicalRow, E>>
    where
        I: IntoIterator<Item = Result<R, E>>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        records.into_iter().filter_map(|r| match r {
            Ok(rec) => self.map(rec.as_ref()).map(Ok),
            Err(e) => Some(Err(e)),
        })
    }
}

/// Read a delimited file and return its discriminator rows.
pub fn extract_rows(
    path: impl AsRef<Path>,
    filter: &DiscriminatorFilter,
) -> Result<Vec<CanonicalRow>, ExportError> {
    let path = path.as_ref();
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("extract_rows", path = %path.display()).entered();
    let records = DelimitedSource::new(path).records()?;
    let rows = filter
        .try_rows(records)
        .collect::<Result<Vec<_>, SourceReadError>>()?;
    #[cfg(feature = "tracing")]
    tracing::debug!(rows = rows.len(), token = filter.token(), "filtered source");
    Ok(rows)
}

/// Outcome of loading a batch of source paths into a [`RowAccumulator`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files read successfully.
    pub loaded: usize,
    /// Rows added across those files.
    pub rows_added: usize,
    /// Paths that are not `.csv` files.
    pub skipped: Vec<PathBuf>,
    /// Files that failed to read; none of their rows were kept.
    pub failed: Vec<ExportError>,
}

/// Rows gathered from several source files, in load order.
#[derive(Clone, Debug)]
pub struct RowAccumulator {
    filter: DiscriminatorFilter,
    rows: Vec<CanonicalRow>,
}

impl RowAccumulator {
    pub fn new(filter: DiscriminatorFilter) -> Self {
        Self {
            filter,
            rows: Vec::new(),
        }
    }

    /// Read one file. A failing file adds nothing.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize, ExportError> {
        let rows = extract_rows(path, &self.filter)?;
        let added = rows.len();
        self.rows.extend(rows);
        Ok(added)
    }

    /// Read every `.csv` file in `paths`; other paths are skipped and failures
    /// are collected rather than stopping the batch.
    pub fn load_paths<I, P>(&mut self, paths: I) -> LoadReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = LoadReport::default();
        for path in paths {
            let path = path.as_ref();
            if !is_csv_file(path) {
                #[cfg(feature = "tracing")]
                tracing::warn!(path = %path.display(), "skipping non-csv source");
                report.skipped.push(path.to_path_buf());
                continue;
            }
            match self.load_path(path) {
                Ok(added) => {
                    report.loaded += 1;
                    report.rows_added += added;
                }
                Err(err) => report.failed.push(err),
            }
        }
        report
    }

    pub fn rows(&self) -> &[CanonicalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Copy of the rows for a consumer that may outlive further loads.
    pub fn snapshot(&self) -> Vec<CanonicalRow> {
        self.rows.clone()
    }

    pub fn take(&mut self) -> Vec<CanonicalRow> {
        std::mem::take(&mut self.rows)
    }
}

fn is_csv_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Short description of a row for previews.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowSummary {
    pub student_id: String,
    pub assessment_type: String,
    pub description: String,
}

impl fmt::Display for RowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StudentID={}, Type={}, Desc={}",
            self.student_id, self.assessment_type, self.description
        )
    }
}

/// Summaries of the first `limit` rows.
pub fn summarize(rows: &[CanonicalRow], limit: usize) -> Vec<RowSummary> {
    rows.iter()
        .take(limit)
        .map(|r| RowSummary {
            student_id: r.student_id().to_string(),
            assessment_type: r.field(AssessmentField::TypeDescription).to_string(),
            description: r.field(AssessmentField::Description).to_string(),
        })
        .collect()
}
