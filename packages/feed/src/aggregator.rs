//! Concurrent fan-out across feed categories.
//!
//! One aggregation pass issues at most one fetch per selected category,
//! all sharing a single deadline. Branch outcomes merge into an
//! [`Aggregate`] that always carries all four categories; a failed branch
//! merges as an empty list.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use onthisday_feed_models::{
    Aggregate, AggregateMetadata, CategoryCounts, EventFilter, FailureReason, FetchOutcome,
    MonthDay,
};
use tokio::time::{Instant, timeout_at};

use crate::CategorySource;

/// Tuning for one aggregation pass.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Budget for the whole pass, shared by every branch. Deliberately
    /// longer than a source's per-request timeout so the per-request
    /// timeout fires first under normal conditions.
    pub timeout: Duration,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(25),
        }
    }
}

/// Fans one day's request out across categories and merges the outcomes.
pub struct Aggregator {
    source: Arc<dyn CategorySource>,
    options: AggregateOptions,
}

impl Aggregator {
    /// Creates an aggregator with default options.
    #[must_use]
    pub fn new(source: Arc<dyn CategorySource>) -> Self {
        Self::with_options(source, AggregateOptions::default())
    }

    /// Creates an aggregator with explicit options.
    #[must_use]
    pub const fn with_options(source: Arc<dyn CategorySource>, options: AggregateOptions) -> Self {
        Self { source, options }
    }

    /// Fetches the selected categories concurrently and merges the
    /// results for one calendar day.
    ///
    /// This never fails: a branch that times out, errors, or decodes
    /// nothing merges as an empty category, and the returned aggregate
    /// always carries all four categories. Unselected categories are not
    /// fetched at all.
    pub async fn aggregate(&self, date: MonthDay, filter: EventFilter) -> Aggregate {
        let deadline = Instant::now() + self.options.timeout;

        // A fired deadline drops the branch future, which aborts its
        // in-flight request.
        let fetches = filter.categories().into_iter().map(|category| async move {
            let outcome = match timeout_at(deadline, self.source.fetch(category, date)).await {
                Ok(outcome) => outcome,
                Err(_) => FetchOutcome::Failure(FailureReason::Timeout),
            };
            (category, outcome)
        });
        let outcomes = join_all(fetches).await;

        let mut aggregate = Aggregate::empty(AggregateMetadata {
            counts: CategoryCounts::default(),
            has_images: false,
            date_label: date.label(),
            fetched_at: Utc::now(),
        });
        for (category, outcome) in outcomes {
            if let FetchOutcome::Failure(reason) = &outcome {
                log::warn!("{category} for {date} degraded to empty ({reason})");
            }
            aggregate.set_records(category, outcome.into_records());
        }
        aggregate.metadata.counts = aggregate.counts();
        aggregate.metadata.has_images = aggregate.has_thumbnails();

        log::debug!(
            "Aggregated {} records for {date} (filter: {filter})",
            aggregate.metadata.counts.total()
        );
        aggregate
    }
}
