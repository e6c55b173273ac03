use dioxus::prelude::*;

use crate::core::selection::{ComposedCell, Snapshot};
use crate::core::view::{GridLayout, GridSurface, ViewController};

/// Highlight colours for selected cells, cycled by row.
const HIGHLIGHTS: [&str; 10] = [
    "#FFFFE0", "#F5FFFA", "#E6E6FA", "#E0FFFF", "#FFDAB9", "#FAF0E6", "#F0FFF0", "#F0F8FF",
    "#FFF5EE", "#FFE4E1",
];

pub(crate) const COLUMN_WIDTH_PX: u32 = 60;
pub(crate) const ROW_HEIGHT_PX: u32 = 30;

pub(crate) fn highlight_color(row: usize) -> &'static str {
    HIGHLIGHTS[(row + 1) % HIGHLIGHTS.len()]
}

pub(crate) fn cell_class(cell: &ComposedCell) -> String {
    let mut class = String::from("chart-grid__cell");
    if cell.is_header_row {
        class.push_str(" chart-grid__cell--top");
    }
    if cell.is_header_column {
        class.push_str(" chart-grid__cell--left");
    }
    if !cell.is_header_row && !cell.is_header_column && cell.value != crate::core::grid::ABSENT {
        class.push_str(" chart-grid__cell--value");
    }
    if cell.selected {
        class.push_str(" chart-grid__cell--selected");
    }
    class
}

/// Redraw hook handed to the [`ViewController`]: bumps an epoch the grid subscribes to.
#[derive(Clone, Copy)]
pub struct RedrawEpoch {
    epoch: Signal<u64>,
}

impl RedrawEpoch {
    pub fn new(epoch: Signal<u64>) -> Self {
        Self { epoch }
    }
}

impl GridSurface for RedrawEpoch {
    fn force_redraw(&mut self) {
        *self.epoch.write() += 1;
    }
}

pub(crate) type ChartController = ViewController<RedrawEpoch>;

/// Paint a composed snapshot with a fixed header row and column.
pub(crate) fn render_grid(
    snapshot: Snapshot,
    layout: GridLayout,
    epoch: Signal<u64>,
    controller: Signal<Option<ChartController>>,
) -> Element {
    // Subscribing to the epoch is what makes overlay writes repaint.
    let generation = epoch();
    let template = format!(
        "grid-template-columns: repeat({}, {COLUMN_WIDTH_PX}px); grid-auto-rows: {ROW_HEIGHT_PX}px;",
        layout.column_count
    );

    rsx! {
        div {
            class: "chart-grid",
            role: "grid",
            style: "{template}",
            "data-generation": "{generation}",
            "data-fixed-rows": "{layout.fixed_row_count}",
            "data-fixed-columns": "{layout.fixed_column_count}",
            for (r, row) in snapshot.rows.into_iter().enumerate() {
                for (c, cell) in row.into_iter().enumerate() {
                    {render_cell(r, c, cell, controller)}
                }
            }
        }
    }
}

fn render_cell(
    r: usize,
    c: usize,
    cell: ComposedCell,
    mut controller: Signal<Option<ChartController>>,
) -> Element {
    let class = cell_class(&cell);
    let style = if cell.selected {
        format!("background-color: {};", highlight_color(r))
    } else {
        String::new()
    };

    rsx! {
        div {
            key: "{r}-{c}",
            class: "{class}",
            role: "gridcell",
            style: "{style}",
            onclick: move |_| {
                controller.with_mut(|view| {
                    if let Some(view) = view.as_mut() {
                        view.toggle(r, c);
                    }
                });
            },
            "{cell.value}"
        }
    }
}
