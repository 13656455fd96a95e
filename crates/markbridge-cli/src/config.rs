use anyhow::{Context, Result};
use markbridge_export::ExportConfig;
use markbridge_grid::GridConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Everything a run can be configured with.
///
/// Export keys sit at the top level; grid keys under `grid:`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct JobConfig {
    #[serde(flatten)]
    pub export: ExportConfig,
    #[serde(default)]
    pub grid: GridConfig,
}

impl JobConfig {
    /// Read a YAML job file, resolving relative paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read job file {}", path.display()))?;
        let job: JobConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("invalid job file {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(job.resolve_paths(base))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn resolve_paths(self, base: &Path) -> Self {
        Self {
            export: self.export.resolve_paths(base),
            grid: self.grid.resolve_paths(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn job_file_overrides_subset_and_rebases_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.yaml");
        fs::write(
            &path,
            "discriminator: sspassess\nrows:\n  sheet: Export\n  header_row: 1\ngrid:\n  data_file: marks.json\n",
        )
        .unwrap();

        let job = JobConfig::from_file(&path).unwrap();
        assert_eq!(job.export.discriminator, "sspassess");
        assert_eq!(job.export.rows.sheet, "Export");
        assert_eq!(job.export.rows.header_row, 1);
        assert_eq!(job.export.rows.first_data_row, 3);
        assert_eq!(job.export.pairs.sheet, "Tab 1 BB Export");
        assert_eq!(job.grid.data_file, dir.path().join("marks.json"));
        assert_eq!(job.grid.initial_rows, 20);
        assert!(job.export.pairs.template.starts_with(dir.path()));
    }

    #[test]
    fn missing_job_file_is_an_error() {
        let err = JobConfig::load(Some(&PathBuf::from("/no/such/job.yaml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read job file"));
        assert_eq!(JobConfig::load(None).unwrap(), JobConfig::default());
    }
}
