//! Active-head tracking and redraw signalling for the chart grid.

use std::sync::Arc;

use thiserror::Error;

use super::grid::GridSet;
use super::selection::{SelectionStore, Snapshot};

/// The surface painting the grid. It does not observe overlay writes by itself.
pub trait GridSurface {
    fn force_redraw(&mut self);
}

/// Shape handed to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub row_count: usize,
    pub column_count: usize,
    pub fixed_row_count: usize,
    pub fixed_column_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("unknown head `{0}`")]
    UnknownCategory(String),
}

/// Owns the selection overlay and the active head of a ready session.
pub struct ViewController<S: GridSurface> {
    selection: SelectionStore,
    active: String,
    surface: S,
}

impl<S: GridSurface> ViewController<S> {
    /// Starts on the first head of the set, or `None` if the set has no heads.
    pub fn new(grids: Arc<GridSet>, surface: S) -> Option<Self> {
        let active = grids.categories().first()?.clone();
        Some(Self {
            selection: SelectionStore::new(grids),
            active,
            surface,
        })
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn categories(&self) -> &[String] {
        self.selection.grids().categories()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn set_active(&mut self, head: &str) -> Result<(), ViewError> {
        if !self.selection.grids().contains(head) {
            return Err(ViewError::UnknownCategory(head.to_string()));
        }
        self.active = head.to_string();
        self.surface.force_redraw();
        Ok(())
    }

    /// Toggle a cell of the active head; redraws only when something changed.
    pub fn toggle(&mut self, row: usize, col: usize) -> bool {
        let changed = self.selection.toggle(&self.active, row, col);
        if changed {
            self.surface.force_redraw();
        }
        changed
    }

    pub fn select_all(&mut self, checked: bool) {
        if self.selection.select_all(&self.active, checked) {
            self.surface.force_redraw();
        }
    }

    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(&self.active)
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.selection.snapshot(&self.active)
    }

    pub fn layout(&self) -> GridLayout {
        let axes = self.selection.grids().axes();
        GridLayout {
            row_count: axes.row_count(),
            column_count: axes.column_count(),
            fixed_row_count: 1,
            fixed_column_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::axis::Axes;
    use crate::core::grid::{CategoryList, SampleSet};
    use time::macros::datetime;

    #[derive(Default)]
    struct CountingSurface {
        redraws: usize,
    }

    impl GridSurface for CountingSurface {
        fn force_redraw(&mut self) {
            self.redraws += 1;
        }
    }

    fn controller() -> ViewController<CountingSurface> {
        let axes = Axes::for_session(datetime!(2025-04-18 14:05 +05:30));
        let heads = CategoryList::new(vec!["A".into(), "B".into()]).unwrap();
        let mut samples = SampleSet::default();
        samples.insert("A", datetime!(2025-04-18 08:30 +05:30), "5");
        samples.insert("A", datetime!(2025-04-18 08:45 +05:30), "6");
        let grids = Arc::new(GridSet::build(&heads, &samples, axes));
        ViewController::new(grids, CountingSurface::default()).unwrap()
    }

    #[test]
    fn starts_on_first_head() {
        let view = controller();
        assert_eq!(view.active(), "A");
        assert_eq!(
            view.layout(),
            GridLayout {
                row_count: 60,
                column_count: 31,
                fixed_row_count: 1,
                fixed_column_count: 1,
            }
        );
    }

    #[test]
    fn unknown_head_is_rejected_without_redraw() {
        let mut view = controller();
        assert_eq!(
            view.set_active("Z"),
            Err(ViewError::UnknownCategory("Z".into()))
        );
        assert_eq!(view.active(), "A");
        assert_eq!(view.surface().redraws, 0);
    }

    #[test]
    fn every_accepted_mutation_redraws() {
        let mut view = controller();
        assert!(view.toggle(1, 1));
        assert!(!view.toggle(0, 1));
        view.select_all(true);
        view.set_active("B").unwrap();
        assert_eq!(view.surface().redraws, 3);
    }

    #[test]
    fn select_all_follows_the_requested_state() {
        let mut view = controller();
        assert!(view.toggle(1, 1));
        assert!(!view.all_selected());

        // An unchecked box clears a partial selection instead of completing it.
        view.select_all(false);
        assert_eq!(view.selection().selected_count("A"), 0);

        view.select_all(true);
        view.select_all(true);
        assert!(view.all_selected());
        assert_eq!(view.selection().selected_count("A"), 2);
        assert_eq!(view.selection().selected_count("B"), 0);
    }
}
