//! Per-head selection overlay on top of immutable grids.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::grid::{Grid, GridSet};

/// A cell as painted: grid contents plus the overlay bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedCell {
    pub value: String,
    pub is_header_row: bool,
    pub is_header_column: bool,
    pub selected: bool,
}

/// Composed view of one head's grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub head: String,
    pub rows: Vec<Vec<ComposedCell>>,
}

impl Snapshot {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&ComposedCell> {
        self.rows.get(row)?.get(col)
    }
}

/// Selection bits keyed by head, then by `(row, col)`.
///
/// Only selectable cells of a known head are ever stored, and nothing clears the
/// overlay except [`SelectionStore::toggle`] and [`SelectionStore::select_all`].
#[derive(Debug, Clone)]
pub struct SelectionStore {
    grids: Arc<GridSet>,
    bits: HashMap<String, BTreeSet<(usize, usize)>>,
}

impl SelectionStore {
    pub fn new(grids: Arc<GridSet>) -> Self {
        Self {
            grids,
            bits: HashMap::new(),
        }
    }

    pub fn grids(&self) -> &GridSet {
        &self.grids
    }

    fn selectable(&self, head: &str, row: usize, col: usize) -> bool {
        self.grids
            .get(head)
            .and_then(|grid| grid.cell(row, col))
            .is_some_and(|cell| cell.is_selectable())
    }

    /// Flip one cell. Returns `false` (and changes nothing) for headers, absent values,
    /// out-of-range addresses and unknown heads.
    pub fn toggle(&mut self, head: &str, row: usize, col: usize) -> bool {
        if !self.selectable(head, row, col) {
            return false;
        }
        let cells = self.bits.entry(head.to_string()).or_default();
        if !cells.remove(&(row, col)) {
            cells.insert((row, col));
        }
        true
    }

    /// Set every selectable cell of `head` to `checked`. Other heads are untouched.
    pub fn select_all(&mut self, head: &str, checked: bool) -> bool {
        let Some(grid) = self.grids.get(head) else {
            return false;
        };
        if checked {
            let all: BTreeSet<(usize, usize)> = grid.data_cells().collect();
            self.bits.insert(head.to_string(), all);
        } else if let Some(cells) = self.bits.get_mut(head) {
            cells.clear();
        }
        true
    }

    pub fn is_selected(&self, head: &str, row: usize, col: usize) -> bool {
        self.bits
            .get(head)
            .is_some_and(|cells| cells.contains(&(row, col)))
    }

    pub fn selected_count(&self, head: &str) -> usize {
        self.bits.get(head).map(BTreeSet::len).unwrap_or(0)
    }

    /// True when the head has at least one selectable cell and all of them are selected.
    pub fn all_selected(&self, head: &str) -> bool {
        let Some(grid) = self.grids.get(head) else {
            return false;
        };
        let total = grid.data_cells().count();
        total > 0 && self.selected_count(head) == total
    }

    pub fn snapshot(&self, head: &str) -> Option<Snapshot> {
        let grid = self.grids.get(head)?;
        Some(self.compose(head, grid))
    }

    fn compose(&self, head: &str, grid: &Grid) -> Snapshot {
        let rows = grid
            .rows()
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, cell)| ComposedCell {
                        value: cell.value.clone(),
                        is_header_row: cell.is_header_row,
                        is_header_column: cell.is_header_column,
                        selected: self.is_selected(head, r, c),
                    })
                    .collect()
            })
            .collect();

        Snapshot {
            head: head.to_string(),
            rows,
        }
    }
}
