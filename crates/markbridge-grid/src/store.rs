//! JSON persistence of keyed pairs.
//!
//! The file is a pretty-printed array of `{"student_id": .., "mark": ..}`
//! objects in memory order. Every store replaces the in-memory set
//! wholesale; nothing is merged.

use markbridge_common::KeyedPair;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no data file at {}", path.display())]
    Missing { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize)]
struct Record {
    #[serde(default, deserialize_with = "lenient_text")]
    student_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    mark: String,
}

/// Strings as-is, `null` as empty, other scalars by their JSON text.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// In-memory pair set backed by one JSON file.
#[derive(Clone, Debug)]
pub struct KeyedPairStore {
    path: PathBuf,
    pairs: Vec<KeyedPair>,
}

impl KeyedPairStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pairs: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for messages, falling back to the full path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn pairs(&self) -> &[KeyedPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn replace(&mut self, pairs: Vec<KeyedPair>) {
        self.pairs = pairs;
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// `id\tvalue` per line; the value may be blank.
    pub fn output_text(&self) -> String {
        self.pairs
            .iter()
            .map(KeyedPair::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn try_save(&self) -> Result<(), StoreError> {
        let records: Vec<Record> = self
            .pairs
            .iter()
            .map(|p| Record {
                student_id: p.id().to_string(),
                mark: p.value().to_string(),
            })
            .collect();
        let json = serde_json::to_string_pretty(&records).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Save, reporting failure as `false`.
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "could not save pairs");
                false
            }
        }
    }

    /// Read the file and replace memory with its valid pairs.
    ///
    /// Records with a blank identifier are dropped. A missing or unreadable
    /// file leaves memory untouched.
    pub fn try_load(&mut self) -> Result<usize, StoreError> {
        if !self.path.is_file() {
            return Err(StoreError::Missing {
                path: self.path.clone(),
            });
        }
        let bytes = fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<Record> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        self.pairs = records
            .into_iter()
            .filter_map(|r| KeyedPair::new(&r.student_id, &r.mark))
            .collect();
        Ok(self.pairs.len())
    }

    /// Load, succeeding only when at least one valid pair was read.
    pub fn load(&mut self) -> bool {
        match self.try_load() {
            Ok(n) => n > 0,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_err, "could not load pairs");
                false
            }
        }
    }
}
