use crate::KeyedPair;
use markbridge_grid::{Grid, PasteKind, PasteOutcome, parse};

/// Paste `text` as two columns into a fresh grid and collect the pairs.
///
/// Rows without an identifier are dropped, as they are when a grid is stored.
///
/// # Example
///
/// ```rust
/// # use markbridge::doc_examples::pairs_from_paste;
/// let pairs = pairs_from_paste("A1\t70\nA2\t\n\t5");
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[1].to_string(), "A2\t");
/// ```
pub fn pairs_from_paste(text: &str) -> Vec<KeyedPair> {
    let mut grid = Grid::new();
    if let PasteOutcome::Parsed(parsed) = parse(PasteKind::Paired, text) {
        grid.apply_paste(&parsed);
    }
    grid.collect_pairs()
}
