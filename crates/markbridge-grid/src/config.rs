use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "student_marks.json";
pub const DEFAULT_INITIAL_ROWS: usize = 20;

/// Grid session settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// JSON file the keyed pairs persist to.
    pub data_file: PathBuf,
    /// Empty rows a new or cleared grid starts with.
    pub initial_rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            initial_rows: DEFAULT_INITIAL_ROWS,
        }
    }
}

impl GridConfig {
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        if self.data_file.is_relative() {
            self.data_file = base.join(&self.data_file);
        }
        self
    }
}
