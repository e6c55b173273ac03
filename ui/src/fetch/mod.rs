//! Two-phase loading of a session's draw data.
//!
//! Phase one resolves the head list. Phase two needs that [`CategoryList`] and fans out
//! one sample request per date of the axis, joined by a barrier; a single aggregation
//! step then decides whether the session becomes ready.

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use time::Date;
use tracing::{debug, info, warn};

use crate::core::axis::{Axes, DateAxis};
use crate::core::grid::{CategoryList, GridSet, SampleRecord, SampleSet};
use crate::core::session::{LoadError, SessionConfig};

mod firestore;
pub use firestore::FirestoreSource;

/// Failure of one request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("credential rejected (HTTP {0})")]
    Unauthorized(u16),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected payload: {0}")]
    Decode(String),
}

impl From<FetchError> for LoadError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Unauthorized(_) => LoadError::Unauthorized,
            other => LoadError::Failed(other.to_string()),
        }
    }
}

/// Map a non-success status to its error. `None` for success statuses.
pub fn classify_status(status: u16) -> Option<FetchError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(FetchError::Unauthorized(status)),
        other => Some(FetchError::Status(other)),
    }
}

/// Tagged result of one request inside the barrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Success(T),
    AuthInvalid,
    Failed(String),
}

impl<T> From<Result<T, FetchError>> for FetchOutcome<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => FetchOutcome::Success(data),
            Err(FetchError::Unauthorized(_)) => FetchOutcome::AuthInvalid,
            Err(err) => FetchOutcome::Failed(err.to_string()),
        }
    }
}

/// Where heads and samples come from.
#[async_trait(?Send)]
pub trait DrawSource {
    /// Ordered head labels of the configured city and category set.
    async fn fetch_categories(&self, config: &SessionConfig) -> Result<Vec<String>, FetchError>;

    /// Every stored record of one day.
    async fn fetch_samples(
        &self,
        config: &SessionConfig,
        date: Date,
    ) -> Result<Vec<SampleRecord>, FetchError>;
}

/// Phase one.
pub async fn resolve_categories<S>(
    source: &S,
    config: &SessionConfig,
) -> Result<CategoryList, LoadError>
where
    S: DrawSource + ?Sized,
{
    let labels = source.fetch_categories(config).await?;
    debug!(count = labels.len(), "resolved heads");
    CategoryList::new(labels).ok_or_else(|| LoadError::Failed("no heads configured".to_string()))
}

/// Phase two. Every request resolves before anything is aggregated.
pub async fn fetch_sample_phase<S>(
    source: &S,
    config: &SessionConfig,
    categories: &CategoryList,
    dates: &DateAxis,
) -> Result<SampleSet, LoadError>
where
    S: DrawSource + ?Sized,
{
    let requests = dates.iter().map(|date| async move {
        let outcome: FetchOutcome<Vec<SampleRecord>> =
            source.fetch_samples(config, date).await.into();
        outcome
    });
    let outcomes = join_all(requests).await;
    aggregate(categories, outcomes)
}

/// Decide the barrier's result: any authorization failure wins, then the first
/// failure in date order, otherwise all records are merged.
pub fn aggregate<I>(categories: &CategoryList, outcomes: I) -> Result<SampleSet, LoadError>
where
    I: IntoIterator<Item = FetchOutcome<Vec<SampleRecord>>>,
{
    let mut records = Vec::new();
    let mut first_failure = None;

    for outcome in outcomes {
        match outcome {
            FetchOutcome::AuthInvalid => return Err(LoadError::Unauthorized),
            FetchOutcome::Failed(reason) => {
                first_failure.get_or_insert(reason);
            }
            FetchOutcome::Success(batch) => records.extend(batch),
        }
    }

    if let Some(reason) = first_failure {
        return Err(LoadError::Failed(reason));
    }
    Ok(SampleSet::from_records(categories, records))
}

/// Run both phases and build the session's grids.
pub async fn load_grids<S>(
    source: &S,
    config: &SessionConfig,
    axes: Axes,
) -> Result<GridSet, LoadError>
where
    S: DrawSource + ?Sized,
{
    let categories = resolve_categories(source, config).await.map_err(|err| {
        warn!(error = %err, "head list fetch failed");
        err
    })?;
    let samples = fetch_sample_phase(source, config, &categories, axes.dates())
        .await
        .map_err(|err| {
            warn!(error = %err, "sample fetch failed");
            err
        })?;

    info!(
        heads = categories.len(),
        days = axes.dates().len(),
        samples = samples.sample_count(),
        "draw data loaded"
    );
    Ok(GridSet::build(&categories, &samples, axes))
}
