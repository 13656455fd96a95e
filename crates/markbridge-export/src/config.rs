use crate::filter::DEFAULT_DISCRIMINATOR;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_MARKS_TEMPLATE: &str = "SEPS Master BB to OneUni mark import template - Final.xlsx";
const DEFAULT_MARKS_OUTPUT: &str =
    "SEPS Master BB to OneUni mark import template - Final with IDs and marks.xlsx";

/// Settings for both export paths.
///
/// Every field has a default, so a job file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// First-field token a source record must carry to be kept.
    pub discriminator: String,
    /// Where filtered assessment rows are written.
    pub rows: RegionTarget,
    /// Where identifier/mark pairs are written.
    pub pairs: PairsTarget,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            rows: RegionTarget::default(),
            pairs: PairsTarget::default(),
        }
    }
}

impl ExportConfig {
    /// Join relative workbook paths onto `base` (usually the job file's directory).
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.rows.workbook = rebase(base, self.rows.workbook);
        self.pairs.template = rebase(base, self.pairs.template);
        self.pairs.output = rebase(base, self.pairs.output);
        self
    }
}

/// Header-resolved region inside an existing workbook.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegionTarget {
    pub workbook: PathBuf,
    pub sheet: String,
    pub header_row: u32,
    pub first_data_row: u32,
}

impl Default for RegionTarget {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_MARKS_OUTPUT),
            sheet: "Tab 3 OneUni Export".to_string(),
            header_row: 2,
            first_data_row: 3,
        }
    }
}

/// Fixed identifier/mark columns in a template, saved to a separate output.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PairsTarget {
    pub template: PathBuf,
    pub output: PathBuf,
    pub sheet: String,
    pub start_row: u32,
    pub id_col: u32,
    pub mark_col: u32,
}

impl Default for PairsTarget {
    fn default() -> Self {
        Self {
            template: PathBuf::from(DEFAULT_MARKS_TEMPLATE),
            output: PathBuf::from(DEFAULT_MARKS_OUTPUT),
            sheet: "Tab 1 BB Export".to_string(),
            start_row: 1,
            id_col: 1,
            mark_col: 2,
        }
    }
}

fn rebase(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_template_conventions() {
        let cfg = ExportConfig::default();
        assert_eq!(cfg.discriminator, "SSPASSESS");
        assert_eq!(cfg.rows.header_row, 2);
        assert_eq!(cfg.rows.first_data_row, 3);
        assert_eq!(cfg.pairs.sheet, "Tab 1 BB Export");
        assert_eq!((cfg.pairs.id_col, cfg.pairs.mark_col), (1, 2));
        assert_eq!(cfg.rows.workbook, cfg.pairs.output);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg: ExportConfig = serde_yaml::from_str(
            "rows:\n  sheet: Export\n  first_data_row: 5\npairs:\n  start_row: 2\n",
        )
        .unwrap();
        assert_eq!(cfg.rows.sheet, "Export");
        assert_eq!(cfg.rows.first_data_row, 5);
        assert_eq!(cfg.rows.header_row, 2);
        assert_eq!(cfg.pairs.start_row, 2);
        assert_eq!(cfg.discriminator, "SSPASSESS");
    }

    #[test]
    fn relative_paths_are_rebased() {
        let base = Path::new("/jobs");
        let mut cfg = ExportConfig::default();
        cfg.pairs.output = PathBuf::from("/abs/out.xlsx");
        let cfg = cfg.resolve_paths(base);
        assert_eq!(cfg.pairs.output, PathBuf::from("/abs/out.xlsx"));
        assert!(cfg.pairs.template.starts_with("/jobs"));
        assert!(cfg.rows.workbook.starts_with("/jobs"));
    }
}
