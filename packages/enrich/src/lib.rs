#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record enrichment and derived metadata for day aggregates.
//!
//! Everything here is pure computation over already-fetched aggregates:
//! no I/O and no failure modes. Enrichment at a fixed timestamp is
//! idempotent, so re-enriching an aggregate that already passed through
//! is safe.

pub mod recommendations;
pub mod summary;

use chrono::{DateTime, Datelike as _, Utc};
use onthisday_feed_models::{Aggregate, AggregateMetadata, Category, Era, MonthDay, Record};
use uuid::Uuid;

/// Derives fresh metadata for an aggregate as of `fetched_at`.
#[must_use]
pub fn derive_metadata(
    aggregate: &Aggregate,
    date: MonthDay,
    fetched_at: DateTime<Utc>,
) -> AggregateMetadata {
    AggregateMetadata {
        counts: aggregate.counts(),
        has_images: aggregate.has_thumbnails(),
        date_label: date.label(),
        fetched_at,
    }
}

/// Enriches an aggregate against the current clock.
#[must_use]
pub fn enrich(aggregate: Aggregate) -> Aggregate {
    enrich_at(aggregate, Utc::now())
}

/// Enriches every record and refreshes the aggregate metadata as of `now`.
///
/// Records that already carry an id keep it; everything else derived here
/// is a pure function of the record and `now`. Enriching twice at the
/// same timestamp therefore changes nothing.
#[must_use]
pub fn enrich_at(mut aggregate: Aggregate, now: DateTime<Utc>) -> Aggregate {
    let current_year = now.year();
    for category in Category::all() {
        for record in aggregate.records_mut(*category) {
            enrich_record(record, current_year);
        }
    }

    aggregate.metadata.counts = aggregate.counts();
    aggregate.metadata.has_images = aggregate.has_thumbnails();
    aggregate.metadata.fetched_at = now;
    aggregate
}

fn enrich_record(record: &mut Record, current_year: i32) {
    if record.id.is_none() {
        record.id = Some(Uuid::new_v4().to_string());
    }
    if let Some(year) = record.year {
        record.era = Some(Era::from_year(year));
        record.time_ago = time_ago(year, current_year);
    }
}

/// Buckets the distance from `year` back to `current_year` into a coarse
/// human label: exact years inside a decade, then decades, centuries, and
/// millennia, flooring at each granularity. Future years have no label.
#[must_use]
pub fn time_ago(year: i32, current_year: i32) -> Option<String> {
    let gap = current_year.checked_sub(year)?;
    if gap < 0 {
        return None;
    }

    Some(if gap < 10 {
        if gap == 1 {
            "1 year ago".to_string()
        } else {
            format!("{gap} years ago")
        }
    } else if gap < 100 {
        format!("{}+ years ago", gap / 10 * 10)
    } else if gap < 1000 {
        let centuries = gap / 100;
        if centuries == 1 {
            "1 century ago".to_string()
        } else {
            format!("{centuries} centuries ago")
        }
    } else {
        let millennia = gap / 1000;
        if millennia == 1 {
            "1+ millennium ago".to_string()
        } else {
            format!("{millennia}+ millennia ago")
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use onthisday_feed_models::CategoryCounts;

    use super::*;

    fn record(year: Option<i32>, headline: &str) -> Record {
        Record {
            year,
            headline: headline.to_string(),
            detail: None,
            source_links: Vec::new(),
            thumbnail_url: None,
            id: None,
            era: None,
            time_ago: None,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap()
    }

    fn sample_aggregate() -> Aggregate {
        let mut aggregate = Aggregate::empty(AggregateMetadata {
            counts: CategoryCounts::default(),
            has_images: false,
            date_label: "July 04".to_string(),
            fetched_at: fixed_now(),
        });
        aggregate.set_records(
            Category::Events,
            vec![record(Some(1969), "Moon landing"), record(Some(44), "Ides")],
        );
        aggregate.set_records(Category::Births, vec![record(None, "A birth")]);
        aggregate.set_records(Category::Holidays, vec![record(None, "A holiday")]);
        aggregate
    }

    #[test]
    fn time_ago_buckets() {
        let cases = [
            (2024, "0 years ago"),
            (2023, "1 year ago"),
            (2020, "4 years ago"),
            (2014, "10+ years ago"),
            (1985, "30+ years ago"),
            (1925, "90+ years ago"),
            (1924, "1 century ago"),
            (1900, "1 century ago"),
            (1524, "5 centuries ago"),
            (1025, "9 centuries ago"),
            (1024, "1+ millennium ago"),
            (24, "2+ millennia ago"),
        ];
        for (year, expected) in cases {
            assert_eq!(
                time_ago(year, 2024).as_deref(),
                Some(expected),
                "year {year}"
            );
        }
        assert_eq!(time_ago(2025, 2024), None);
    }

    #[test]
    fn assigns_identity_era_and_distance() {
        let enriched = enrich_at(sample_aggregate(), fixed_now());

        let moon = &enriched.records(Category::Events)[0];
        assert!(moon.id.is_some());
        assert_eq!(moon.era, Some(Era::Twentieth));
        assert_eq!(moon.time_ago.as_deref(), Some("50+ years ago"));

        let ides = &enriched.records(Category::Events)[1];
        assert_eq!(ides.era, Some(Era::Ancient));
        assert_eq!(ides.time_ago.as_deref(), Some("1+ millennium ago"));

        // No year means no derived history, but identity is still assigned.
        let birth = &enriched.records(Category::Births)[0];
        assert!(birth.id.is_some());
        assert_eq!(birth.era, None);
        assert_eq!(birth.time_ago, None);
    }

    #[test]
    fn preserves_existing_ids() {
        let mut aggregate = sample_aggregate();
        aggregate.records_mut(Category::Events)[0].id = Some("keep-me".to_string());

        let enriched = enrich_at(aggregate, fixed_now());
        assert_eq!(
            enriched.records(Category::Events)[0].id.as_deref(),
            Some("keep-me")
        );
    }

    #[test]
    fn enrichment_is_idempotent_at_a_fixed_time() {
        let once = enrich_at(sample_aggregate(), fixed_now());
        let twice = enrich_at(once.clone(), fixed_now());
        assert_eq!(once, twice);
    }

    #[test]
    fn refreshes_metadata_from_records() {
        let mut aggregate = sample_aggregate();
        aggregate.records_mut(Category::Holidays)[0].thumbnail_url =
            Some("https://upload.example/holiday.jpg".to_string());
        let later = Utc.with_ymd_and_hms(2024, 7, 4, 13, 0, 0).unwrap();

        let enriched = enrich_at(aggregate, later);
        assert_eq!(enriched.metadata.counts.events, 2);
        assert_eq!(enriched.metadata.counts.births, 1);
        assert_eq!(enriched.metadata.counts.deaths, 0);
        assert_eq!(enriched.metadata.counts.holidays, 1);
        assert!(enriched.metadata.has_images);
        assert_eq!(enriched.metadata.fetched_at, later);
    }

    #[test]
    fn derive_metadata_snapshot() {
        let aggregate = sample_aggregate();
        let metadata = derive_metadata(&aggregate, MonthDay::new(7, 4).unwrap(), fixed_now());

        assert_eq!(metadata.counts.total(), 4);
        assert!(!metadata.has_images);
        assert_eq!(metadata.date_label, "July 04");
        assert_eq!(metadata.fetched_at, fixed_now());
    }
}
