//! End-to-end load and selection flow against an in-memory draw source.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::executor::block_on;
use time::macros::{date, datetime, offset};
use time::{Date, UtcOffset};

use ui::core::axis::{build_date_axis, build_time_axis, Axes};
use ui::core::grid::{GridSet, SampleRecord, ABSENT, CORNER_LABEL};
use ui::core::session::{LoadError, SessionConfig, SessionState};
use ui::core::view::{GridSurface, ViewController};
use ui::fetch::{load_grids, DrawSource, FetchError};

const IST: UtcOffset = offset!(+05:30);

#[derive(Default)]
struct MemorySource {
    heads: Option<Result<Vec<String>, FetchError>>,
    days: HashMap<Date, Result<Vec<SampleRecord>, FetchError>>,
    sample_calls: RefCell<Vec<Date>>,
}

impl MemorySource {
    fn with_heads(heads: &[&str]) -> Self {
        Self {
            heads: Some(Ok(heads.iter().map(|h| h.to_string()).collect())),
            ..Self::default()
        }
    }

    fn day(mut self, date: Date, result: Result<Vec<SampleRecord>, FetchError>) -> Self {
        self.days.insert(date, result);
        self
    }
}

#[async_trait(?Send)]
impl DrawSource for MemorySource {
    async fn fetch_categories(&self, _config: &SessionConfig) -> Result<Vec<String>, FetchError> {
        self.heads.clone().unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_samples(
        &self,
        _config: &SessionConfig,
        date: Date,
    ) -> Result<Vec<SampleRecord>, FetchError> {
        self.sample_calls.borrow_mut().push(date);
        self.days.get(&date).cloned().unwrap_or(Ok(Vec::new()))
    }
}

#[derive(Default)]
struct CountingSurface {
    redraws: usize,
}

impl GridSurface for CountingSurface {
    fn force_redraw(&mut self) {
        self.redraws += 1;
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        token: "test-token".into(),
        city_id: "city".into(),
        category_id: "daily".into(),
        documents_url: "https://example.test/documents".into(),
    }
}

/// Three-day window ending 2025-04-18.
fn axes() -> Axes {
    Axes::new(build_date_axis(date!(2025 - 04 - 18), 3), build_time_axis(), IST)
}

fn record(at: time::OffsetDateTime, values: &[Option<&str>]) -> SampleRecord {
    SampleRecord {
        at,
        values: values.iter().map(|v| v.map(str::to_string)).collect(),
    }
}

fn load(source: &MemorySource) -> Result<GridSet, LoadError> {
    block_on(load_grids(source, &config(), axes()))
}

fn three_head_source() -> MemorySource {
    MemorySource::with_heads(&["A", "B", "C"]).day(
        date!(2025 - 04 - 17),
        Ok(vec![record(
            datetime!(2025-04-17 08:30 +05:30),
            &[Some("5"), None, Some("7")],
        )]),
    )
}

#[test]
fn three_heads_produce_three_equally_shaped_grids() {
    let grids = load(&three_head_source()).unwrap();
    assert_eq!(grids.categories().to_vec(), vec!["A", "B", "C"]);

    let a = grids.get("A").unwrap();
    for head in ["B", "C"] {
        let other = grids.get(head).unwrap();
        assert_eq!(other.row_count(), a.row_count());
        assert_eq!(other.column_count(), a.column_count());
        assert_eq!(other.rows()[0], a.rows()[0], "date header of {head}");
        for r in 0..a.row_count() {
            assert_eq!(other.cell(r, 0), a.cell(r, 0), "time label row {r} of {head}");
        }
    }

    assert_eq!(a.row_count(), 60);
    assert_eq!(a.column_count(), 4);
    assert_eq!(a.cell(0, 0).unwrap().value, CORNER_LABEL);
    assert_eq!(a.cell(0, 1).unwrap().value, "18\nApr");
    assert_eq!(a.cell(0, 3).unwrap().value, "16\nApr");
    assert_eq!(a.cell(1, 0).unwrap().value, "08:30\nAM");
}

#[test]
fn record_values_land_on_their_heads() {
    let grids = load(&three_head_source()).unwrap();
    // 2025-04-17 is the second date column; 08:30 the first slot row.
    assert_eq!(grids.get("A").unwrap().cell(1, 2).unwrap().value, "5");
    assert_eq!(grids.get("B").unwrap().cell(1, 2).unwrap().value, ABSENT);
    assert_eq!(grids.get("C").unwrap().cell(1, 2).unwrap().value, "7");
    assert_eq!(grids.get("A").unwrap().cell(1, 1).unwrap().value, ABSENT);
}

#[test]
fn every_date_of_the_window_is_requested_once() {
    let source = three_head_source();
    load(&source).unwrap();
    let mut calls = source.sample_calls.borrow().clone();
    calls.sort();
    assert_eq!(
        calls,
        vec![date!(2025 - 04 - 16), date!(2025 - 04 - 17), date!(2025 - 04 - 18)]
    );
}

#[test]
fn rejected_credential_on_heads_stops_before_samples() {
    let source = MemorySource {
        heads: Some(Err(FetchError::Unauthorized(403))),
        ..MemorySource::default()
    };
    assert_eq!(load(&source), Err(LoadError::Unauthorized));
    assert!(source.sample_calls.borrow().is_empty());

    let mut state = SessionState::Loading;
    state.resolve(load(&source));
    assert_eq!(state, SessionState::Unauthorized);
}

#[test]
fn empty_head_list_fails_the_session() {
    let source = MemorySource::with_heads(&[]);
    assert!(matches!(load(&source), Err(LoadError::Failed(_))));
    assert!(source.sample_calls.borrow().is_empty());
}

#[test]
fn rejected_credential_in_any_day_wins() {
    let source = three_head_source()
        .day(date!(2025 - 04 - 18), Err(FetchError::Status(500)))
        .day(date!(2025 - 04 - 16), Err(FetchError::Unauthorized(401)));
    assert_eq!(load(&source), Err(LoadError::Unauthorized));
    assert_eq!(source.sample_calls.borrow().len(), 3);
}

#[test]
fn server_error_in_one_day_fails_the_session() {
    let source = three_head_source().day(date!(2025 - 04 - 18), Err(FetchError::Status(503)));
    let mut state = SessionState::Loading;
    state.resolve(load(&source));
    assert!(matches!(state, SessionState::Failed(reason) if reason.contains("503")));
}

#[test]
fn selection_survives_switching_heads() {
    let grids = Arc::new(load(&three_head_source()).unwrap());
    let mut view = ViewController::new(grids, CountingSurface::default()).unwrap();
    assert_eq!(view.active(), "A");

    assert!(view.toggle(1, 2));
    view.set_active("B").unwrap();
    assert_eq!(view.selection().selected_count("B"), 0);
    assert!(!view.snapshot().unwrap().cell(1, 2).unwrap().selected);

    view.set_active("A").unwrap();
    let snapshot = view.snapshot().unwrap();
    assert_eq!(snapshot.head, "A");
    assert!(snapshot.cell(1, 2).unwrap().selected);
    assert_eq!(view.surface().redraws, 3);
}

#[test]
fn absent_and_header_cells_cannot_be_selected() {
    let grids = Arc::new(load(&three_head_source()).unwrap());
    let mut view = ViewController::new(grids, CountingSurface::default()).unwrap();

    assert!(!view.toggle(0, 0));
    assert!(!view.toggle(0, 2));
    assert!(!view.toggle(1, 0));
    assert!(!view.toggle(1, 1));
    assert_eq!(view.surface().redraws, 0);

    view.select_all(true);
    assert!(view.all_selected());
    assert_eq!(view.selection().selected_count("A"), 1);
}

#[test]
fn switching_to_an_unknown_head_is_rejected() {
    let grids = Arc::new(load(&three_head_source()).unwrap());
    let mut view = ViewController::new(grids, CountingSurface::default()).unwrap();
    assert!(view.set_active("Z").is_err());
    assert_eq!(view.active(), "A");
}
