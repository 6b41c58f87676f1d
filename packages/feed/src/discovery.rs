//! Random historical fact discovery.
//!
//! Draws a random calendar day and surfaces one record from it. Days are
//! drawn with the safe day cap from [`MonthDay::random`], so every draw is
//! a real calendar date.

use onthisday_feed_models::{Category, MonthDay, Record};
use rand::Rng;

use crate::CategorySource;

/// A randomly drawn record from a randomly drawn day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomFact {
    /// The day that was drawn.
    pub date: MonthDay,
    /// The category the record came from.
    pub category: Category,
    /// The record itself.
    pub record: Record,
}

/// Draws a random day and returns one uniformly random record from it.
///
/// Returns `None` when the drawn day yields no records, whether the day
/// was genuinely empty upstream or the fetch failed.
pub async fn random_fact<R: Rng + ?Sized>(
    source: &dyn CategorySource,
    category: Category,
    rng: &mut R,
) -> Option<RandomFact> {
    let date = MonthDay::random(rng);
    let mut records = source.fetch(category, date).await.into_records();
    if records.is_empty() {
        log::debug!("No {category} records for randomly drawn {date}");
        return None;
    }

    let record = records.swap_remove(rng.gen_range(0..records.len()));
    Some(RandomFact {
        date,
        category,
        record,
    })
}
