//! Aggregator: folds per-server snapshots into one category total.

use admon_core::{AggregateDocument, Category, Snapshot};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no {0} snapshots to aggregate")]
    EmptyInput(Category),
}

/// Sum `snapshots` field-wise and stamp the result with the current time.
///
/// The timestamp is taken after the fold, not from any snapshot.
pub fn aggregate<S: Snapshot>(
    snapshots: impl IntoIterator<Item = S>,
) -> Result<AggregateDocument<S>, AggregateError> {
    let totals = sum(snapshots)?;
    Ok(AggregateDocument {
        timestamp: Utc::now(),
        totals,
    })
}

/// [`aggregate`] with an explicit timestamp.
pub fn aggregate_at<S: Snapshot>(
    snapshots: impl IntoIterator<Item = S>,
    timestamp: DateTime<Utc>,
) -> Result<AggregateDocument<S>, AggregateError> {
    Ok(AggregateDocument {
        timestamp,
        totals: sum(snapshots)?,
    })
}

fn sum<S: Snapshot>(snapshots: impl IntoIterator<Item = S>) -> Result<S, AggregateError> {
    snapshots
        .into_iter()
        .reduce(S::combine)
        .ok_or(AggregateError::EmptyInput(S::CATEGORY))
}
