//! Delimited text sources.
//!
//! Files are UTF-8 with an optional byte-order mark, one record per line,
//! standard CSV quoting. Records are yielded lazily as owned field vectors;
//! ragged records are allowed and empty lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reading or decoding a delimited source failed.
#[derive(Debug, thiserror::Error)]
#[error("{}{}: {message}", path.display(), line.map(|l| format!(" (line {l})")).unwrap_or_default())]
pub struct SourceReadError {
    pub path: PathBuf,
    pub line: Option<u64>,
    pub message: String,
}

impl SourceReadError {
    fn new(path: &Path, line: Option<u64>, err: impl std::fmt::Display) -> Self {
        Self {
            path: path.to_path_buf(),
            line,
            message: err.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DelimitedSource {
    path: PathBuf,
}

impl DelimitedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the file and start yielding records.
    pub fn records(&self) -> Result<DelimitedRecords<File>, SourceReadError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %self.path.display(), "opening delimited source");
        let file = File::open(&self.path).map_err(|e| SourceReadError::new(&self.path, None, e))?;
        self.records_from_reader(file)
    }

    /// Yield records from an arbitrary reader; `path` in errors stays this
    /// source's path.
    pub fn records_from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<DelimitedRecords<R>, SourceReadError> {
        let reader = skip_bom(reader).map_err(|e| SourceReadError::new(&self.path, None, e))?;
        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            // Allow ragged rows; short records are padded by the consumer.
            .flexible(true)
            .from_reader(reader);
        Ok(DelimitedRecords {
            path: self.path.clone(),
            inner: rdr.into_records(),
        })
    }
}

/// Lazy record iterator over a delimited source.
pub struct DelimitedRecords<R: Read> {
    path: PathBuf,
    inner: csv::StringRecordsIntoIter<BufReader<R>>,
}

impl<R: Read> Iterator for DelimitedRecords<R> {
    type Item = Result<Vec<String>, SourceReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rec = self.inner.next()?;
        Some(
            rec.map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| {
                    let line = e.position().map(|p| p.line());
                    SourceReadError::new(&self.path, line, e)
                }),
        )
    }
}

fn skip_bom<R: Read>(reader: R) -> std::io::Result<BufReader<R>> {
    let mut buf = BufReader::new(reader);
    if buf.fill_buf()?.starts_with(UTF8_BOM) {
        buf.consume(UTF8_BOM.len());
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(bytes: &[u8]) -> Result<Vec<Vec<String>>, SourceReadError> {
        DelimitedSource::new("memory.csv")
            .records_from_reader(Cursor::new(bytes.to_vec()))?
            .collect()
    }

    #[test]
    fn strips_leading_bom() {
        let records = read_all(b"\xEF\xBB\xBFSSPASSESS,A\n").unwrap();
        assert_eq!(records, vec![vec!["SSPASSESS".to_string(), "A".into()]]);
    }

    #[test]
    fn quoted_fields_and_ragged_rows() {
        let records = read_all(b"a,\"b, c\",\"say \"\"hi\"\"\"\n1\n\n2,3\n").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0][1], "b, c");
        assert_eq!(records[0][2], "say \"hi\"");
        assert_eq!(records[1], vec!["1".to_string()]);
        assert_eq!(records[2], vec!["2".to_string(), "3".into()]);
    }

    #[test]
    fn invalid_utf8_reports_path_and_line() {
        let err = read_all(b"ok,row\nbad,\xFF\xFE\n").unwrap_err();
        assert_eq!(err.path, PathBuf::from("memory.csv"));
        assert!(err.line.is_some());
        assert!(err.to_string().starts_with("memory.csv"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = DelimitedSource::new(&path).records().err().unwrap();
        assert_eq!(err.path, path);
        assert_eq!(err.line, None);
    }
}
