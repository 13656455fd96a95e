use crate::paste::ParsedPaste;
use markbridge_common::KeyedPair;
use rustc_hash::FxHashSet;

/// Stable identity of a grid row. Survives deletions of other rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Id,
    Value,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridRow {
    pub id: String,
    pub value: String,
}

impl GridRow {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Both cells blank after trimming.
    pub fn is_empty(&self) -> bool {
        self.id.trim().is_empty() && self.value.trim().is_empty()
    }

    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::Id => &self.id,
            Column::Value => &self.value,
        }
    }

    fn cell_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::Id => &mut self.id,
            Column::Value => &mut self.value,
        }
    }
}

/// Where a paste landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasteReport {
    /// Zero-based position of the first written row.
    pub start: usize,
    pub count: usize,
    /// Rows appended to make room.
    pub appended: usize,
}

/// Ordered identifier/value rows with a selection.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    rows: Vec<(RowHandle, GridRow)>,
    selected: FxHashSet<RowHandle>,
    next_handle: u64,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(count: usize) -> Self {
        let mut grid = Self::new();
        grid.add_empty_rows(count);
        grid
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (RowHandle, &GridRow)> {
        self.rows.iter().map(|(h, r)| (*h, r))
    }

    pub fn get(&self, handle: RowHandle) -> Option<&GridRow> {
        self.position(handle).map(|i| &self.rows[i].1)
    }

    pub fn position(&self, handle: RowHandle) -> Option<usize> {
        self.rows.iter().position(|(h, _)| *h == handle)
    }

    pub fn handle_at(&self, position: usize) -> Option<RowHandle> {
        self.rows.get(position).map(|(h, _)| *h)
    }

    // ---- selection ----

    /// Add a row to the selection. Returns false for an unknown handle.
    pub fn select(&mut self, handle: RowHandle) -> bool {
        if self.position(handle).is_none() {
            return false;
        }
        self.selected.insert(handle);
        true
    }

    pub fn set_selection(&mut self, handles: impl IntoIterator<Item = RowHandle>) {
        self.selected.clear();
        for h in handles {
            self.select(h);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected handles in grid order.
    pub fn selected(&self) -> Vec<RowHandle> {
        self.rows
            .iter()
            .map(|(h, _)| *h)
            .filter(|h| self.selected.contains(h))
            .collect()
    }

    // ---- editing ----

    /// Append `count` empty rows and return their handles.
    pub fn add_empty_rows(&mut self, count: usize) -> Vec<RowHandle> {
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            let handle = RowHandle(self.next_handle);
            self.next_handle += 1;
            self.rows.push((handle, GridRow::default()));
            handles.push(handle);
        }
        handles
    }

    /// Grow to at least `count` rows. Returns the number appended.
    pub fn ensure_rows(&mut self, count: usize) -> usize {
        let missing = count.saturating_sub(self.rows.len());
        self.add_empty_rows(missing);
        missing
    }

    /// Remove the selected rows; returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        let before = self.rows.len();
        let selected = std::mem::take(&mut self.selected);
        self.rows.retain(|(h, _)| !selected.contains(h));
        before - self.rows.len()
    }

    /// Drop every row and start over with `initial_rows` empty ones.
    pub fn clear(&mut self, initial_rows: usize) {
        self.rows.clear();
        self.selected.clear();
        self.add_empty_rows(initial_rows);
    }

    /// Overwrite one cell. Returns false if the row no longer exists.
    pub fn set_cell(
        &mut self,
        handle: RowHandle,
        column: Column,
        value: impl Into<String>,
    ) -> bool {
        match self.rows.iter_mut().find(|(h, _)| *h == handle) {
            Some((_, row)) => {
                *row.cell_mut(column) = value.into();
                true
            }
            None => false,
        }
    }

    /// First selected row, else the first row with both cells empty, else
    /// the end of the grid.
    pub fn insertion_start(&self) -> usize {
        if let Some(i) = self
            .rows
            .iter()
            .position(|(h, _)| self.selected.contains(h))
        {
            return i;
        }
        self.rows
            .iter()
            .position(|(_, r)| r.is_empty())
            .unwrap_or(self.rows.len())
    }

    /// Merge a parsed paste at [`insertion_start`](Self::insertion_start).
    ///
    /// Single-column pastes only overwrite their column. Rows outside the
    /// written span are left alone.
    pub fn apply_paste(&mut self, paste: &ParsedPaste) -> PasteReport {
        let start = self.insertion_start();
        let count = paste.len();
        let appended = self.ensure_rows(start + count);
        let target = &mut self.rows[start..start + count];

        match paste {
            ParsedPaste::Single { column, values } => {
                for ((_, row), value) in target.iter_mut().zip(values) {
                    *row.cell_mut(*column) = value.clone();
                }
            }
            ParsedPaste::Paired(pairs) => {
                for ((_, row), (id, value)) in target.iter_mut().zip(pairs) {
                    row.id = id.clone();
                    row.value = value.clone();
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(start, count, appended, "applied paste");
        PasteReport {
            start,
            count,
            appended,
        }
    }

    /// Trimmed pairs of every row with a non-blank identifier, in grid order.
    pub fn collect_pairs(&self) -> Vec<KeyedPair> {
        self.rows
            .iter()
            .filter_map(|(_, r)| KeyedPair::new(&r.id, &r.value))
            .collect()
    }

    /// Replace the grid with exactly one row per pair.
    pub fn load_pairs(&mut self, pairs: &[KeyedPair]) {
        self.clear(0);
        for (handle, pair) in self.add_empty_rows(pairs.len()).into_iter().zip(pairs) {
            self.set_cell(handle, Column::Id, pair.id());
            self.set_cell(handle, Column::Value, pair.value());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_of(rows: &[(&str, &str)]) -> Grid {
        let mut grid = Grid::with_rows(rows.len());
        let handles: Vec<_> = grid.rows().map(|(h, _)| h).collect();
        for (h, (id, v)) in handles.into_iter().zip(rows) {
            grid.set_cell(h, Column::Id, *id);
            grid.set_cell(h, Column::Value, *v);
        }
        grid
    }

    fn cells(grid: &Grid) -> Vec<(String, String)> {
        grid.rows()
            .map(|(_, r)| (r.id.clone(), r.value.clone()))
            .collect()
    }

    fn owned(rows: &[(&str, &str)]) -> Vec<(String, String)> {
        rows.iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    fn ids(values: &[&str]) -> ParsedPaste {
        ParsedPaste::Single {
            column: Column::Id,
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn start_prefers_first_empty_row_without_selection() {
        let mut grid = grid_of(&[("", ""), ("X", "1"), ("", "")]);
        assert_eq!(grid.insertion_start(), 0);

        let report = grid.apply_paste(&ids(&["a", "b"]));
        assert_eq!(report.start, 0);
        assert_eq!(report.appended, 0);
        assert_eq!(cells(&grid), owned(&[("a", ""), ("b", "1"), ("", "")]));
    }

    #[test]
    fn selection_wins_over_empty_rows() {
        let mut grid = grid_of(&[("", ""), ("X", "1"), ("Y", "2")]);
        let second = grid.handle_at(1).unwrap();
        let third = grid.handle_at(2).unwrap();
        grid.set_selection([third, second]);
        assert_eq!(grid.insertion_start(), 1);
        assert_eq!(grid.selected(), vec![second, third]);
    }

    #[test]
    fn full_grid_appends_exactly_enough() {
        let mut grid = grid_of(&[("X", "1"), ("Y", "2")]);
        let paste = ParsedPaste::Paired(owned(&[("a", "9"), ("b", "")]));
        let report = grid.apply_paste(&paste);
        assert_eq!((report.start, report.count, report.appended), (2, 2, 2));
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.get(grid.handle_at(3).unwrap()).unwrap().id, "b");
    }

    #[test]
    fn value_paste_keeps_identifiers() {
        let mut grid = grid_of(&[("s1", ""), ("s2", "old"), ("s3", "")]);
        grid.select(grid.handle_at(0).unwrap());
        grid.apply_paste(&ParsedPaste::Single {
            column: Column::Value,
            values: vec!["70".into(), "".into()],
        });
        assert_eq!(cells(&grid), owned(&[("s1", "70"), ("s2", ""), ("s3", "")]));
    }

    #[test]
    fn handles_survive_deletion() {
        let mut grid = grid_of(&[("a", ""), ("b", ""), ("c", "")]);
        let b = grid.handle_at(1).unwrap();
        let c = grid.handle_at(2).unwrap();
        grid.select(b);
        assert_eq!(grid.delete_selected(), 1);
        assert_eq!(grid.delete_selected(), 0);
        assert_eq!(grid.position(c), Some(1));
        assert!(!grid.set_cell(b, Column::Id, "z"));
        assert!(grid.set_cell(c, Column::Value, "5"));
    }

    #[test]
    fn collect_and_load_round_trip() {
        let grid = grid_of(&[(" s1 ", " 70 "), ("", "99"), ("s2", "")]);
        let pairs = grid.collect_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].id(), pairs[0].value()), ("s1", "70"));

        let mut other = Grid::with_rows(20);
        other.load_pairs(&pairs);
        assert_eq!(other.len(), 2);
        assert_eq!(other.collect_pairs(), pairs);

        other.clear(20);
        assert_eq!(other.len(), 20);
        assert!(other.collect_pairs().is_empty());
    }
}
