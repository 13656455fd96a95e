use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value as stored in a single worksheet cell.
///
/// Only the shapes the export pipeline reads or writes are modelled; anything
/// else a backend encounters (errors, rich text, dates) is surfaced as `Text`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty,
}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Int(i) => i.hash(state),
            CellValue::Number(n) => n.to_bits().hash(state),
            CellValue::Text(s) => s.hash(state),
            CellValue::Boolean(b) => b.hash(state),
            CellValue::Empty => state.write_u8(0),
        }
    }
}

impl Eq for CellValue {}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Empty => write!(f, ""),
        }
    }
}

impl CellValue {
    /// True for `Empty` and for zero-length text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

/// Number format attached to a cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    #[default]
    General,
    /// Explicit "format as text" marker (`@`); keeps leading zeros and
    /// non-numeric marks literal when the file is reopened.
    Text,
    Custom(String),
}

impl NumberFormat {
    pub const TEXT_CODE: &'static str = "@";
    pub const GENERAL_CODE: &'static str = "General";

    pub fn code(&self) -> &str {
        match self {
            NumberFormat::General => Self::GENERAL_CODE,
            NumberFormat::Text => Self::TEXT_CODE,
            NumberFormat::Custom(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "" | Self::GENERAL_CODE => NumberFormat::General,
            Self::TEXT_CODE => NumberFormat::Text,
            other => NumberFormat::Custom(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct CellData {
    pub value: Option<CellValue>,
    pub format: Option<NumberFormat>,
}

impl CellData {
    pub fn from_value<V: IntoCellValue>(value: V) -> Self {
        Self {
            value: Some(value.into_cell_value()),
            format: None,
        }
    }

    /// Text value carrying the explicit text-format marker.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(CellValue::Text(value.into())),
            format: Some(NumberFormat::Text),
        }
    }

    /// A cell with no value. Writing it clears whatever was there.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.value.as_ref().is_none_or(CellValue::is_blank)
    }

    pub fn is_text_formatted(&self) -> bool {
        matches!(self.format, Some(NumberFormat::Text))
    }

    /// Display text of the value, empty when there is none.
    pub fn display_text(&self) -> String {
        self.value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

/// Local conversion trait so tests and callers can pass primitives directly
pub trait IntoCellValue {
    fn into_cell_value(self) -> CellValue;
}

impl IntoCellValue for CellValue {
    fn into_cell_value(self) -> CellValue {
        self
    }
}

impl IntoCellValue for f64 {
    fn into_cell_value(self) -> CellValue {
        CellValue::Number(self)
    }
}

impl IntoCellValue for i64 {
    fn into_cell_value(self) -> CellValue {
        CellValue::Int(self)
    }
}

impl IntoCellValue for i32 {
    fn into_cell_value(self) -> CellValue {
        CellValue::Int(self as i64)
    }
}

impl IntoCellValue for bool {
    fn into_cell_value(self) -> CellValue {
        CellValue::Boolean(self)
    }
}

impl IntoCellValue for String {
    fn into_cell_value(self) -> CellValue {
        CellValue::Text(self)
    }
}

impl IntoCellValue for &str {
    fn into_cell_value(self) -> CellValue {
        CellValue::Text(self.to_string())
    }
}
