//! Identifier/mark grid editing.
//!
//! A [`Grid`] holds an ordered list of two-cell rows addressed by stable
//! [`RowHandle`]s. Clipboard text is parsed by [`paste`] into one or two
//! columns and merged at the insertion position. Collected pairs persist
//! through a [`KeyedPairStore`], and [`GridSession`] ties the pieces together
//! with user-facing [`Status`] messages.

pub mod clipboard;
pub mod config;
pub mod grid;
pub mod paste;
pub mod session;
pub mod store;

pub use clipboard::{ClipboardError, ClipboardSource, MemoryClipboard};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use config::GridConfig;
pub use grid::{Column, Grid, GridRow, PasteReport, RowHandle};
pub use paste::{
    ParsedPaste, PasteKind, PasteOutcome, parse, parse_paired, parse_single, read_paste,
    split_lines,
};
pub use session::{GridSession, Status, StatusKind, format_processed};
pub use store::{KeyedPairStore, StoreError};

pub use markbridge_common::KeyedPair;
