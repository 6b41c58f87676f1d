#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data model for the "on this day" historical feed system.
//!
//! This crate defines the four-category feed taxonomy, the validated
//! month/day pair used to address a feed day, and the aggregate shape that
//! every consumer receives. Upstream fetch failure is represented as data
//! ([`FetchOutcome`]) rather than as an error type, so a partially failed
//! day still produces a structurally complete [`Aggregate`].

use chrono::{DateTime, Datelike as _, Local, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The four feed categories served for any calendar day.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Historical events that occurred on the date.
    Events,
    /// Notable people born on the date.
    Births,
    /// Notable people who died on the date.
    Deaths,
    /// Holidays and observances tied to the date.
    Holidays,
}

impl Category {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Events, Self::Births, Self::Deaths, Self::Holidays]
    }

    /// Returns the path segment this category uses in upstream feed URLs.
    #[must_use]
    pub const fn api_segment(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Births => "births",
            Self::Deaths => "deaths",
            Self::Holidays => "holidays",
        }
    }

    /// Returns the human-readable section heading for this category.
    #[must_use]
    pub const fn display_title(self) -> &'static str {
        match self {
            Self::Events => "Historical Events",
            Self::Births => "Notable Births",
            Self::Deaths => "Notable Deaths",
            Self::Holidays => "Holidays & Observances",
        }
    }
}

/// Selects which categories a feed request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// Fetch all four categories.
    All,
    /// Fetch a single category.
    Only(Category),
}

impl EventFilter {
    /// Returns whether the given category is selected by this filter.
    #[must_use]
    pub const fn includes(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected as u8 == category as u8,
        }
    }

    /// Returns the categories this filter selects, in taxonomy order.
    #[must_use]
    pub fn categories(self) -> Vec<Category> {
        Category::all()
            .iter()
            .copied()
            .filter(|category| self.includes(*category))
            .collect()
    }
}

impl std::str::FromStr for EventFilter {
    type Err = InvalidFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<Category>()
            .map(Self::Only)
            .map_err(|_| InvalidFilterError {
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for EventFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Error returned when parsing an [`EventFilter`] from an unknown token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFilterError {
    /// The token that was provided.
    pub value: String,
}

impl std::fmt::Display for InvalidFilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid event filter {:?}: expected \"all\" or a category name",
            self.value
        )
    }
}

impl std::error::Error for InvalidFilterError {}

/// A month/day pair addressing one calendar day of the feed, any year.
///
/// Construction validates numeric ranges only. Calendar validity is the
/// caller's contract: February 30 is accepted here and simply yields
/// nothing upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u8,
    day: u8,
}

impl MonthDay {
    /// Creates a month/day pair after range validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is outside 1-12 or the day is outside
    /// 1-31. The month is checked first.
    pub const fn new(month: u8, day: u8) -> Result<Self, InvalidDateError> {
        match (month, day) {
            (1..=12, 1..=31) => Ok(Self { month, day }),
            (1..=12, _) => Err(InvalidDateError::DayOutOfRange { day }),
            _ => Err(InvalidDateError::MonthOutOfRange { month }),
        }
    }

    /// Returns the current local calendar day.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self {
            month: today.month() as u8,
            day: today.day() as u8,
        }
    }

    /// Draws a uniformly random day. Days are capped at 28 so every month
    /// yields a real calendar date.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            month: rng.gen_range(1..=12),
            day: rng.gen_range(1..=28),
        }
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// Returns the human-readable label for this day, e.g. `"July 04"`.
    ///
    /// Labels resolve against a leap reference year so February 29 has a
    /// month name. Calendar-invalid pairs fall back to the `"MM/DD"` form.
    #[must_use]
    pub fn label(self) -> String {
        NaiveDate::from_ymd_opt(2000, u32::from(self.month), u32::from(self.day))
            .map_or_else(|| self.to_string(), |date| date.format("%B %d").to_string())
    }
}

impl std::fmt::Display for MonthDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.day)
    }
}

/// Error returned when constructing a [`MonthDay`] from out-of-range parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidDateError {
    /// The month was outside 1-12.
    MonthOutOfRange {
        /// The invalid month value that was provided.
        month: u8,
    },
    /// The day was outside 1-31.
    DayOutOfRange {
        /// The invalid day value that was provided.
        day: u8,
    },
}

impl std::fmt::Display for InvalidDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MonthOutOfRange { month } => {
                write!(f, "invalid month {month}: expected 1-12")
            }
            Self::DayOutOfRange { day } => write!(f, "invalid day {day}: expected 1-31"),
        }
    }
}

impl std::error::Error for InvalidDateError {}

/// Coarse historical period a record's year falls into.
///
/// Variants are declared oldest-first so the derived ordering is
/// chronological.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Era {
    /// Years before 1000.
    #[serde(rename = "Ancient Times")]
    #[strum(serialize = "Ancient Times")]
    Ancient,
    /// Years 1000-1499.
    #[serde(rename = "Medieval Period")]
    #[strum(serialize = "Medieval Period")]
    Medieval,
    /// Years 1500-1599.
    #[serde(rename = "16th Century")]
    #[strum(serialize = "16th Century")]
    Sixteenth,
    /// Years 1600-1699.
    #[serde(rename = "17th Century")]
    #[strum(serialize = "17th Century")]
    Seventeenth,
    /// Years 1700-1799.
    #[serde(rename = "18th Century")]
    #[strum(serialize = "18th Century")]
    Eighteenth,
    /// Years 1800-1899.
    #[serde(rename = "19th Century")]
    #[strum(serialize = "19th Century")]
    Nineteenth,
    /// Years 1900-1999.
    #[serde(rename = "20th Century")]
    #[strum(serialize = "20th Century")]
    Twentieth,
    /// Years 2000 and later.
    #[serde(rename = "21st Century")]
    #[strum(serialize = "21st Century")]
    TwentyFirst,
}

impl Era {
    /// Buckets a year into its era.
    #[must_use]
    pub const fn from_year(year: i32) -> Self {
        if year >= 2000 {
            Self::TwentyFirst
        } else if year >= 1900 {
            Self::Twentieth
        } else if year >= 1800 {
            Self::Nineteenth
        } else if year >= 1700 {
            Self::Eighteenth
        } else if year >= 1600 {
            Self::Seventeenth
        } else if year >= 1500 {
            Self::Sixteenth
        } else if year >= 1000 {
            Self::Medieval
        } else {
            Self::Ancient
        }
    }
}

/// A titled link back to a reference page for a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLink {
    /// Human-readable page title.
    pub title: String,
    /// Absolute URL of the page.
    pub url: String,
}

/// One historical record within a category.
///
/// `id`, `era`, and `time_ago` are `None` as fetched; enrichment assigns
/// them. They are omitted from JSON until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Year the event occurred, when the upstream feed provides one.
    pub year: Option<i32>,
    /// One-line description of the event.
    pub headline: String,
    /// Longer extract, when available.
    pub detail: Option<String>,
    /// Reference pages related to the record.
    pub source_links: Vec<SourceLink>,
    /// Thumbnail image URL, when available.
    pub thumbnail_url: Option<String>,
    /// Stable identity assigned by enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Era bucket derived from `year` by enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<Era>,
    /// Human-readable distance from the current year, e.g. `"4 years ago"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_ago: Option<String>,
}

/// Why a category fetch produced no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FailureReason {
    /// The fetch did not complete within its deadline.
    Timeout,
    /// The request failed below HTTP, or the response status was not 2xx.
    Transport,
    /// The response body was not the expected shape.
    Decode,
}

/// The result of fetching one category: records, or a reason there are none.
///
/// This is a value, not an error. Callers that only want records collapse
/// it with [`FetchOutcome::into_records`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fetch completed and decoded.
    Success(Vec<Record>),
    /// The fetch failed; no records are available.
    Failure(FailureReason),
}

impl FetchOutcome {
    /// Returns whether this outcome carries records.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Collapses the outcome into records, with failure yielding none.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Success(records) => records,
            Self::Failure(_) => Vec::new(),
        }
    }
}

/// Per-category record counts for one aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    /// Number of event records.
    pub events: usize,
    /// Number of birth records.
    pub births: usize,
    /// Number of death records.
    pub deaths: usize,
    /// Number of holiday records.
    pub holidays: usize,
}

impl CategoryCounts {
    /// Returns the count for the given category.
    #[must_use]
    pub const fn get(self, category: Category) -> usize {
        match category {
            Category::Events => self.events,
            Category::Births => self.births,
            Category::Deaths => self.deaths,
            Category::Holidays => self.holidays,
        }
    }

    /// Returns the total record count across all categories.
    #[must_use]
    pub const fn total(self) -> usize {
        self.events + self.births + self.deaths + self.holidays
    }
}

/// Derived metadata describing one aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetadata {
    /// Per-category record counts.
    pub counts: CategoryCounts,
    /// Whether any record in the aggregate carries a thumbnail.
    pub has_images: bool,
    /// Human-readable label of the requested day, e.g. `"July 04"`.
    pub date_label: String,
    /// When the aggregate was assembled.
    pub fetched_at: DateTime<Utc>,
}

/// Merged feed for one calendar day.
///
/// All four category fields are always present. A category that failed or
/// was not selected is an empty list, indistinguishable from a genuinely
/// empty upstream day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// Historical event records.
    pub events: Vec<Record>,
    /// Birth records.
    pub births: Vec<Record>,
    /// Death records.
    pub deaths: Vec<Record>,
    /// Holiday records.
    pub holidays: Vec<Record>,
    /// Derived metadata for the aggregate.
    pub metadata: AggregateMetadata,
}

impl Aggregate {
    /// Creates an aggregate with all four categories empty.
    #[must_use]
    pub const fn empty(metadata: AggregateMetadata) -> Self {
        Self {
            events: Vec::new(),
            births: Vec::new(),
            deaths: Vec::new(),
            holidays: Vec::new(),
            metadata,
        }
    }

    /// Returns the records for the given category.
    #[must_use]
    pub fn records(&self, category: Category) -> &[Record] {
        match category {
            Category::Events => &self.events,
            Category::Births => &self.births,
            Category::Deaths => &self.deaths,
            Category::Holidays => &self.holidays,
        }
    }

    /// Returns a mutable handle to the records for the given category.
    pub fn records_mut(&mut self, category: Category) -> &mut Vec<Record> {
        match category {
            Category::Events => &mut self.events,
            Category::Births => &mut self.births,
            Category::Deaths => &mut self.deaths,
            Category::Holidays => &mut self.holidays,
        }
    }

    /// Replaces the records for the given category.
    pub fn set_records(&mut self, category: Category, records: Vec<Record>) {
        *self.records_mut(category) = records;
    }

    /// Returns whether every category is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
            && self.births.is_empty()
            && self.deaths.is_empty()
            && self.holidays.is_empty()
    }

    /// Counts the records currently held per category.
    #[must_use]
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            events: self.events.len(),
            births: self.births.len(),
            deaths: self.deaths.len(),
            holidays: self.holidays.len(),
        }
    }

    /// Returns whether any record carries a non-empty thumbnail URL.
    #[must_use]
    pub fn has_thumbnails(&self) -> bool {
        self.entries().any(|(_, records)| {
            records
                .iter()
                .any(|record| record.thumbnail_url.as_deref().is_some_and(|url| !url.is_empty()))
        })
    }

    /// Iterates the categories in taxonomy order with their records.
    pub fn entries(&self) -> impl Iterator<Item = (Category, &[Record])> + '_ {
        Category::all()
            .iter()
            .map(move |&category| (category, self.records(category)))
    }
}
