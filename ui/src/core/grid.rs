//! Dense per-head grids built from sparse draw samples.

use std::collections::{BTreeMap, HashMap};

use time::OffsetDateTime;
use tracing::debug;

use super::axis::Axes;
use super::format::{format_date_label, format_slot_label};

/// Value shown for a slot without a draw result.
pub const ABSENT: &str = "-";
/// Label of the corner cell.
pub const CORNER_LABEL: &str = "Time";

/// Ordered head labels resolved by the category-list fetch.
///
/// Holding one is the precondition for fetching samples: record values are
/// positional and only mean something against this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryList(Vec<String>);

impl CategoryList {
    /// `None` when the fetch resolved no heads at all.
    pub fn new(labels: Vec<String>) -> Option<Self> {
        if labels.is_empty() {
            None
        } else {
            Some(Self(labels))
        }
    }

    /// Label at a positional index of a sample record.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// The default active head.
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Labels with repeats removed, first occurrence kept.
    fn distinct(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.0.len());
        for label in &self.0 {
            if !out.contains(label) {
                out.push(label.clone());
            }
        }
        out
    }
}

/// One stored draw record: an instant and one optional value per positional index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    pub at: OffsetDateTime,
    pub values: Vec<Option<String>>,
}

/// Samples of a single head keyed by exact instant.
pub type SampleMap = BTreeMap<OffsetDateTime, String>;

/// Samples of every head of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSet {
    by_head: HashMap<String, SampleMap>,
}

impl SampleSet {
    /// Spread positional record values over the heads.
    ///
    /// Values past the end of the head list are dropped; a short record simply leaves
    /// the remaining heads without a value at that instant. Later records win.
    pub fn from_records<I>(categories: &CategoryList, records: I) -> Self
    where
        I: IntoIterator<Item = SampleRecord>,
    {
        let mut set = Self::default();
        for label in categories.iter() {
            set.by_head.entry(label.to_string()).or_default();
        }

        for record in records {
            if record.values.len() > categories.len() {
                debug!(
                    at = %record.at,
                    extra = record.values.len() - categories.len(),
                    "record carries more values than heads"
                );
            }
            for (index, value) in record.values.into_iter().enumerate() {
                let (Some(label), Some(value)) = (categories.label(index), value) else {
                    continue;
                };
                set.insert(label, record.at, value);
            }
        }
        set
    }

    pub fn insert(&mut self, head: &str, at: OffsetDateTime, value: impl Into<String>) {
        self.by_head
            .entry(head.to_string())
            .or_default()
            .insert(at, value.into());
    }

    pub fn head(&self, head: &str) -> Option<&SampleMap> {
        self.by_head.get(head)
    }

    pub fn sample_count(&self) -> usize {
        self.by_head.values().map(BTreeMap::len).sum()
    }

    /// Samples whose instant is not a cell of `axes` (off-slot minutes, outside the window).
    pub fn off_grid_count(&self, axes: &Axes) -> usize {
        self.by_head
            .values()
            .flat_map(BTreeMap::keys)
            .filter(|at| axes.position(**at).is_none())
            .count()
    }
}

/// A single grid cell. Selection lives in the overlay, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub value: String,
    pub is_header_row: bool,
    pub is_header_column: bool,
}

impl Cell {
    fn header_row(value: String) -> Self {
        Self {
            value,
            is_header_row: true,
            is_header_column: false,
        }
    }

    fn header_column(value: String) -> Self {
        Self {
            value,
            is_header_row: false,
            is_header_column: true,
        }
    }

    fn data(value: Option<&String>) -> Self {
        Self {
            value: value.cloned().unwrap_or_else(|| ABSENT.to_string()),
            is_header_row: false,
            is_header_column: false,
        }
    }

    /// True for cells that can be selected: not a header and carrying a value.
    pub fn is_selectable(&self) -> bool {
        !self.is_header_row && !self.is_header_column && self.value != ABSENT
    }
}

/// Dense `(times + 1) × (dates + 1)` matrix for one head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Addresses of every selectable cell.
    pub fn data_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_selectable())
                .map(move |(c, _)| (r, c))
        })
    }
}

fn header_row(axes: &Axes) -> Vec<Cell> {
    std::iter::once(Cell {
        value: CORNER_LABEL.to_string(),
        is_header_row: true,
        is_header_column: true,
    })
    .chain(axes.dates().iter().map(|d| Cell::header_row(format_date_label(d))))
    .collect()
}

/// Build the grid of one head by exact instant lookup.
pub fn build_grid(samples: &SampleMap, axes: &Axes) -> Grid {
    let mut rows = Vec::with_capacity(axes.row_count());
    rows.push(header_row(axes));

    for (r, slot) in axes.times().iter().enumerate() {
        let mut row = Vec::with_capacity(axes.column_count());
        row.push(Cell::header_column(format_slot_label(slot)));
        for c in 0..axes.dates().len() {
            let value = axes
                .instant(r + 1, c + 1)
                .and_then(|instant| samples.get(&instant));
            row.push(Cell::data(value));
        }
        rows.push(row);
    }

    Grid { rows }
}

/// Every head's grid, all sharing one set of axes. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSet {
    axes: Axes,
    order: Vec<String>,
    grids: HashMap<String, Grid>,
}

impl GridSet {
    pub fn build(categories: &CategoryList, samples: &SampleSet, axes: Axes) -> Self {
        let hidden = samples.off_grid_count(&axes);
        if hidden > 0 {
            debug!(hidden, "samples fall outside the grid window");
        }
        let empty = SampleMap::new();
        let order = categories.distinct();
        let grids = order
            .iter()
            .map(|head| {
                let map = samples.head(head).unwrap_or(&empty);
                (head.clone(), build_grid(map, &axes))
            })
            .collect();

        Self { axes, order, grids }
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    /// Heads in resolved order.
    pub fn categories(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, head: &str) -> bool {
        self.grids.contains_key(head)
    }

    pub fn get(&self, head: &str) -> Option<&Grid> {
        self.grids.get(head)
    }
}
