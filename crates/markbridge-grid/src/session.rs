//! A grid, its pair store, a clipboard and an output buffer driven together.
//!
//! Every operation returns a [`Status`]. Soft failures (empty clipboard,
//! nothing to store, unreadable data file) are statuses, never errors.

use crate::clipboard::ClipboardSource;
use crate::config::GridConfig;
use crate::grid::{Column, Grid, RowHandle};
use crate::paste::{PasteKind, PasteOutcome, read_paste};
use crate::store::KeyedPairStore;
use markbridge_common::KeyedPair;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// The operation changed something.
    Done,
    /// Nothing to do; state is unchanged.
    NoOp,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    fn done(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Done,
            message: message.into(),
        }
    }

    fn noop(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::NoOp,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Failed,
            message: message.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.kind == StatusKind::Done
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// `id value` per line, the default hand-off for processed pairs.
pub fn format_processed(pairs: &[KeyedPair]) -> String {
    pairs
        .iter()
        .map(|p| format!("{} {}", p.id(), p.value()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct GridSession<C: ClipboardSource> {
    config: GridConfig,
    grid: Grid,
    store: KeyedPairStore,
    clipboard: C,
    output: String,
    status: Status,
}

impl<C: ClipboardSource> GridSession<C> {
    /// Start with `initial_rows` empty rows and load the data file if it
    /// holds any pairs.
    pub fn new(config: GridConfig, clipboard: C) -> Self {
        let grid = Grid::with_rows(config.initial_rows);
        let mut store = KeyedPairStore::new(config.data_file.clone());
        let status = if store.load() {
            Status::done(format!(
                "Loaded {} row(s) from previous session.",
                store.len()
            ))
        } else {
            Status::done(format!("Added {} empty row(s).", config.initial_rows))
        };
        Self {
            config,
            grid,
            store,
            clipboard,
            output: String::new(),
            status,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct access for selection changes.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn store(&self) -> &KeyedPairStore {
        &self.store
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Status of the last operation.
    pub fn status(&self) -> &Status {
        &self.status
    }

    fn report(&mut self, status: Status) -> Status {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = ?status.kind, message = %status.message, "grid status");
        self.status = status.clone();
        status
    }

    // ---- paste ----

    pub fn paste_ids(&mut self) -> Status {
        self.paste(PasteKind::Single(Column::Id))
    }

    pub fn paste_marks(&mut self) -> Status {
        self.paste(PasteKind::Single(Column::Value))
    }

    pub fn paste_pairs(&mut self) -> Status {
        self.paste(PasteKind::Paired)
    }

    pub fn paste(&mut self, kind: PasteKind) -> Status {
        let outcome = read_paste(&mut self.clipboard, kind);
        self.apply(kind, outcome)
    }

    /// Merge already-read text as if it came from the clipboard.
    pub fn paste_text(&mut self, kind: PasteKind, text: &str) -> Status {
        let outcome = crate::paste::parse(kind, text);
        self.apply(kind, outcome)
    }

    fn apply(&mut self, kind: PasteKind, outcome: PasteOutcome) -> Status {
        let status = match outcome {
            PasteOutcome::AccessDenied(_) => Status::noop("Clipboard is empty or not text."),
            PasteOutcome::Empty => Status::noop(match kind {
                PasteKind::Single(Column::Id) => "No IDs found to paste.",
                PasteKind::Single(Column::Value) => "No marks found to paste.",
                PasteKind::Paired => "Nothing to paste.",
            }),
            PasteOutcome::Parsed(parsed) => {
                let report = self.grid.apply_paste(&parsed);
                let row = report.start + 1;
                Status::done(match kind {
                    PasteKind::Single(Column::Id) => {
                        format!("Pasted {} ID(s) starting at row {row}.", report.count)
                    }
                    PasteKind::Single(Column::Value) => format!(
                        "Pasted {} mark value(s) starting at row {row}.",
                        report.count
                    ),
                    PasteKind::Paired => format!(
                        "Pasted {} row(s) (2-column) starting at row {row}.",
                        report.count
                    ),
                })
            }
        };
        self.report(status)
    }

    // ---- grid maintenance ----

    pub fn add_rows(&mut self, count: usize) -> Status {
        self.grid.add_empty_rows(count);
        self.report(Status::done(format!("Added {count} empty row(s).")))
    }

    pub fn delete_selected(&mut self) -> Status {
        let status = match self.grid.delete_selected() {
            0 => Status::noop("No rows selected to delete."),
            n => Status::done(format!("Deleted {n} row(s).")),
        };
        self.report(status)
    }

    pub fn clear_grid(&mut self) -> Status {
        self.grid.clear(self.config.initial_rows);
        self.report(Status::done("Grid cleared."))
    }

    pub fn edit_cell(&mut self, handle: RowHandle, column: Column, value: &str) -> Status {
        let status = if self.grid.set_cell(handle, column, value) {
            let row = self.grid.position(handle).map_or(0, |i| i + 1);
            Status::done(format!("Edited row {row}."))
        } else {
            Status::noop("Row no longer exists.")
        };
        self.report(status)
    }

    // ---- store / retrieve / persist ----

    /// Replace memory with the grid's pairs and save them.
    pub fn store_pairs(&mut self) -> Status {
        let pairs = self.grid.collect_pairs();
        if pairs.is_empty() {
            return self.report(Status::noop("Store: no IDs found."));
        }
        self.store.replace(pairs);
        let mut message = format!("Stored {} row(s).", self.store.len());
        if self.store.save() {
            message.push_str(&format!(" Saved to '{}'.", self.store.file_name()));
        }
        self.report(Status::done(message))
    }

    /// Put the stored pairs in the output as `id\tmark` lines, loading the
    /// data file first when memory is empty.
    pub fn retrieve(&mut self) -> Status {
        if self.store.is_empty() && !self.store.load() {
            return self.report(Status::noop("Retrieve: no data found."));
        }
        self.output = self.store.output_text();
        let status = Status::done(format!("Retrieved {} row(s).", self.store.len()));
        self.report(status)
    }

    /// Load the data file and rebuild the grid from it.
    pub fn load_from_file(&mut self) -> Status {
        if !self.store.load() {
            return self.report(Status::noop("Load: no data file or empty file."));
        }
        self.grid.load_pairs(self.store.pairs());
        let status = Status::done(format!("Loaded {} row(s) from file.", self.store.len()));
        self.report(status)
    }

    /// Save memory, collecting from the grid first when memory is empty.
    pub fn save_to_file(&mut self) -> Status {
        if self.store.is_empty() {
            let pairs = self.grid.collect_pairs();
            if pairs.is_empty() {
                return self.report(Status::noop("Save: nothing to save."));
            }
            self.store.replace(pairs);
        }
        let status = if self.store.save() {
            Status::done("Saved to file.")
        } else {
            Status::failed("Save failed.")
        };
        self.report(status)
    }

    /// Hand the grid's pairs to `sink`.
    pub fn process<F>(&mut self, sink: F) -> Status
    where
        F: FnOnce(&[KeyedPair]),
    {
        let pairs = self.grid.collect_pairs();
        if pairs.is_empty() {
            return self.report(Status::noop("Process: no data found."));
        }
        sink(&pairs);
        self.report(Status::done(format!("Processed {} row(s).", pairs.len())))
    }

    // ---- output ----

    pub fn set_output(&mut self, text: impl Into<String>) {
        self.output = text.into();
    }

    pub fn copy_output(&mut self) -> Status {
        let text = self.output.trim_matches('\n');
        if text.trim().is_empty() {
            return self.report(Status::noop("Output is empty; nothing to copy."));
        }
        let status = match self.clipboard.set_text(text) {
            Ok(()) => Status::done("Output copied to clipboard."),
            Err(err) => Status::failed(format!("Could not copy output: {err}")),
        };
        self.report(status)
    }

    pub fn clear_output(&mut self) -> Status {
        self.output.clear();
        self.report(Status::done("Output cleared."))
    }
}
