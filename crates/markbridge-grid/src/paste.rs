//! Clipboard text parsing.
//!
//! Single-column pastes fill either identifiers or values. Identifier pastes
//! drop blank lines; value pastes keep them as empty values, since a blank
//! mark still occupies its row. Two-column pastes split each line on tab
//! when it has one and on comma otherwise.

use crate::clipboard::{ClipboardError, ClipboardSource};
use crate::grid::Column;

/// Which grid columns a paste fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasteKind {
    Single(Column),
    Paired,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedPaste {
    Single { column: Column, values: Vec<String> },
    Paired(Vec<(String, String)>),
}

impl ParsedPaste {
    pub fn len(&self) -> usize {
        match self {
            ParsedPaste::Single { values, .. } => values.len(),
            ParsedPaste::Paired(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> PasteKind {
        match self {
            ParsedPaste::Single { column, .. } => PasteKind::Single(*column),
            ParsedPaste::Paired(_) => PasteKind::Paired,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Text was read but nothing parsed out of it.
    Empty,
    Parsed(ParsedPaste),
    /// The clipboard could not be read or held no text.
    AccessDenied(ClipboardError),
}

/// Split on `\n`, `\r\n` or `\r`. A trailing terminator does not start an
/// extra line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(i) => {
                lines.push(&rest[..i]);
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

pub fn parse_single(text: &str, column: Column) -> Vec<String> {
    let lines = split_lines(text).into_iter().map(str::trim);
    match column {
        Column::Id => lines.filter(|l| !l.is_empty()).map(str::to_string).collect(),
        Column::Value => lines.map(str::to_string).collect(),
    }
}

/// `(identifier, value)` per line; a missing value is empty.
pub fn parse_paired(text: &str) -> Vec<(String, String)> {
    split_lines(text)
        .into_iter()
        .map(|line| {
            let sep = if line.contains('\t') { '\t' } else { ',' };
            let mut parts = line.split(sep);
            let id = parts.next().unwrap_or_default().trim().to_string();
            let value = parts.next().unwrap_or_default().trim().to_string();
            (id, value)
        })
        .collect()
}

pub fn parse(kind: PasteKind, text: &str) -> PasteOutcome {
    let parsed = match kind {
        PasteKind::Single(column) => ParsedPaste::Single {
            column,
            values: parse_single(text, column),
        },
        PasteKind::Paired => ParsedPaste::Paired(parse_paired(text)),
    };
    if parsed.is_empty() {
        PasteOutcome::Empty
    } else {
        PasteOutcome::Parsed(parsed)
    }
}

/// Read the clipboard and parse it. Clipboard failures come back as
/// [`PasteOutcome::AccessDenied`], never as errors.
pub fn read_paste<C: ClipboardSource + ?Sized>(clipboard: &mut C, kind: PasteKind) -> PasteOutcome {
    match clipboard.get_text() {
        Ok(text) => parse(kind, &text),
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %err, "clipboard read failed");
            PasteOutcome::AccessDenied(err)
        }
    }
}
