//! Discovery recommendations derived from one day's aggregate.
//!
//! Pure data shaping for "what to look at next" carousels: nearby dates,
//! highlight days in the same month, round-number anniversary years, and
//! stubs of the day's own records.

use chrono::Datelike as _;
use onthisday_feed_models::{Aggregate, Category, MonthDay};
use serde::{Deserialize, Serialize};

use crate::summary::truncate_text;

/// Day offsets for the related-dates carousel.
const RELATED_OFFSETS: [u8; 3] = [1, 7, 30];

/// Highlight days surfaced for the requested month.
const HIGHLIGHT_DAYS: [u8; 2] = [1, 15];

/// Round-number anniversary offsets, in years.
const ANNIVERSARY_OFFSETS: [i32; 4] = [10, 25, 50, 100];

/// Maximum similar-record stubs per category.
const MAX_SIMILAR: usize = 3;

/// Maximum characters in a similar-record title.
const MAX_SIMILAR_TITLE: usize = 50;

/// A nearby calendar day worth exploring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedDate {
    /// Month of the suggested day.
    pub month: u8,
    /// Day of the suggested day.
    pub day: u8,
    /// Human-readable label, e.g. `"July 05"`.
    pub label: String,
    /// How many days past the requested day this suggestion sits.
    pub offset_days: u8,
}

/// A fixed highlight day in the requested month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthHighlight {
    /// Month of the highlight.
    pub month: u8,
    /// Day of the highlight.
    pub day: u8,
    /// Human-readable label, e.g. `"July 15"`.
    pub label: String,
}

/// A round-number anniversary year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anniversary {
    /// Distance back from the aggregate's year.
    pub years_ago: i32,
    /// The calendar year the anniversary points at.
    pub year: i32,
    /// Label, e.g. `"50 years ago (1974)"`.
    pub label: String,
}

/// A truncated stub of one of the day's own records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarItem {
    /// Truncated headline.
    pub title: String,
    /// Year of the underlying record.
    pub year: Option<i32>,
}

/// Everything the discovery carousel shows for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    /// Nearby days, one per offset in [`RELATED_OFFSETS`].
    pub related_dates: Vec<RelatedDate>,
    /// Highlight days of the same month, excluding the requested day.
    pub same_month_highlights: Vec<MonthHighlight>,
    /// Round-number anniversary years.
    pub anniversaries: Vec<Anniversary>,
    /// Stubs of the day's event records.
    pub similar_events: Vec<SimilarItem>,
    /// Stubs of the day's birth records.
    pub similar_births: Vec<SimilarItem>,
    /// Stubs of the day's death records.
    pub similar_deaths: Vec<SimilarItem>,
}

/// Builds the discovery carousel data for one day's aggregate.
///
/// Anniversary years count back from the aggregate's `fetched_at` year,
/// so the output is a pure function of its inputs.
#[must_use]
pub fn recommendations(date: MonthDay, aggregate: &Aggregate) -> Recommendations {
    let current_year = aggregate.metadata.fetched_at.year();
    Recommendations {
        related_dates: related_dates(date),
        same_month_highlights: same_month_highlights(date),
        anniversaries: anniversaries(current_year),
        similar_events: similar(aggregate, Category::Events),
        similar_births: similar(aggregate, Category::Births),
        similar_deaths: similar(aggregate, Category::Deaths),
    }
}

/// Walks the 1..=31 day cycle without skipping the month seam, keeping
/// the suggestion inside the requested month.
fn related_dates(date: MonthDay) -> Vec<RelatedDate> {
    RELATED_OFFSETS
        .iter()
        .filter_map(|&offset| {
            let day = (date.day() - 1 + offset) % 31 + 1;
            let suggested = MonthDay::new(date.month(), day).ok()?;
            Some(RelatedDate {
                month: suggested.month(),
                day: suggested.day(),
                label: suggested.label(),
                offset_days: offset,
            })
        })
        .collect()
}

fn same_month_highlights(date: MonthDay) -> Vec<MonthHighlight> {
    HIGHLIGHT_DAYS
        .iter()
        .filter(|&&day| day != date.day())
        .filter_map(|&day| {
            let suggested = MonthDay::new(date.month(), day).ok()?;
            Some(MonthHighlight {
                month: suggested.month(),
                day: suggested.day(),
                label: suggested.label(),
            })
        })
        .collect()
}

fn anniversaries(current_year: i32) -> Vec<Anniversary> {
    ANNIVERSARY_OFFSETS
        .iter()
        .map(|&years_ago| {
            let year = current_year - years_ago;
            Anniversary {
                years_ago,
                year,
                label: format!("{years_ago} years ago ({year})"),
            }
        })
        .collect()
}

fn similar(aggregate: &Aggregate, category: Category) -> Vec<SimilarItem> {
    aggregate
        .records(category)
        .iter()
        .take(MAX_SIMILAR)
        .map(|record| SimilarItem {
            title: truncate_text(&record.headline, MAX_SIMILAR_TITLE),
            year: record.year,
        })
        .collect()
}
