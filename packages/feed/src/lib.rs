#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Historical feed fetching and aggregation.
//!
//! The upstream provider implements the [`CategorySource`] trait to define
//! how one category of one calendar day is fetched. The
//! [`aggregator::Aggregator`] fans a day's request out across categories
//! concurrently and merges whatever comes back; a category that fails is
//! merged as empty rather than failing the whole day.

pub mod aggregator;
pub mod discovery;
pub mod wikimedia;

use async_trait::async_trait;
use onthisday_feed_models::{Category, FetchOutcome, MonthDay};

/// Errors that can occur while constructing feed components.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The HTTP client could not be built.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Trait that all category fetch backends implement.
///
/// The contract is strict: one fetch covers one category of one day, and
/// implementations never fail past this boundary. Upstream problems are
/// logged and returned as [`FetchOutcome::Failure`], never raised.
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// Fetches one category of records for one calendar day.
    async fn fetch(&self, category: Category, date: MonthDay) -> FetchOutcome;
}
