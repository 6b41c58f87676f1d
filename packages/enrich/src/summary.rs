//! Markdown digests of an aggregate for chat-style surfaces.
//!
//! Data shaping only: callers decide where the markdown goes.

use std::fmt::Write as _;

use onthisday_feed_models::{Aggregate, Category, EventFilter, MonthDay, Record};

/// Per-category record caps for the combined digest. Holidays stay out
/// of the combined view, which sticks to the three narrative categories.
const ALL_DIGEST_CAPS: [(Category, usize); 3] = [
    (Category::Events, 3),
    (Category::Births, 2),
    (Category::Deaths, 2),
];

/// Record cap when the digest covers a single category.
const SINGLE_DIGEST_CAP: usize = 5;

/// Link cap under an event or holiday line.
const MAX_RELATED_LINKS: usize = 2;

/// Link cap under a birth or death line.
const MAX_LEARN_MORE_LINKS: usize = 1;

/// Renders a markdown digest of the aggregate for one day.
///
/// `EventFilter::All` shows a capped cross-section of events, births,
/// and deaths, skipping empty sections. A single-category filter shows
/// up to [`SINGLE_DIGEST_CAP`] records, or a "nothing found" line when
/// the category is empty.
#[must_use]
pub fn digest(aggregate: &Aggregate, filter: EventFilter, date: MonthDay) -> String {
    let mut output = String::new();

    writeln!(output, "# Historical Facts for {}", date.label()).unwrap();
    writeln!(output).unwrap();

    match filter {
        EventFilter::All => {
            for (category, cap) in ALL_DIGEST_CAPS {
                append_section(&mut output, aggregate, category, cap);
            }
        }
        EventFilter::Only(category) => {
            if aggregate.records(category).is_empty() {
                writeln!(
                    output,
                    "No {} found for {}.",
                    category.api_segment(),
                    date.label()
                )
                .unwrap();
            } else {
                append_section(&mut output, aggregate, category, SINGLE_DIGEST_CAP);
            }
        }
    }

    output
}

/// Renders one record as a markdown line, with the category's icon and
/// link subline.
#[must_use]
pub fn record_line(record: &Record, category: Category) -> String {
    let mut line = String::new();

    match record.year {
        Some(year) => write!(line, "**{year}**: {}", record.headline).unwrap(),
        None => line.push_str(&record.headline),
    }

    match category {
        Category::Births => line.push_str(" 🎂"),
        Category::Deaths => line.push_str(" ⚰️"),
        Category::Events | Category::Holidays => {}
    }

    let (label, cap) = match category {
        Category::Births | Category::Deaths => ("Learn more", MAX_LEARN_MORE_LINKS),
        Category::Events | Category::Holidays => ("Related", MAX_RELATED_LINKS),
    };
    let links = record
        .source_links
        .iter()
        .take(cap)
        .map(|link| format!("[{}]({})", link.title, link.url))
        .collect::<Vec<_>>();
    if !links.is_empty() {
        write!(line, "\n*{label}: {}*", links.join(", ")).unwrap();
    }

    line
}

/// Truncates to at most `max_chars` characters, ellipsis included,
/// never splitting a character.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept = text
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        format!("{kept}...")
    }
}

fn append_section(output: &mut String, aggregate: &Aggregate, category: Category, cap: usize) {
    let records = aggregate.records(category);
    if records.is_empty() {
        return;
    }

    writeln!(output, "## {} {}", icon(category), category.display_title()).unwrap();
    for record in records.iter().take(cap) {
        writeln!(output, "{}", record_line(record, category)).unwrap();
        writeln!(output).unwrap();
    }
}

const fn icon(category: Category) -> &'static str {
    match category {
        Category::Events => "📅",
        Category::Births => "🎂",
        Category::Deaths => "⚰️",
        Category::Holidays => "🎉",
    }
}
