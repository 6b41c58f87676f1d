//! Wikimedia "on this day" feed client.
//!
//! One GET per category per day against `{base}/{category}/{MM}/{DD}`,
//! decoding only the fields the feed model carries. Anything else the
//! upstream includes is ignored, so feed-side schema growth is harmless.
//!
//! See <https://api.wikimedia.org/wiki/Feed_API/Reference/On_this_day>

use std::time::Duration;

use async_trait::async_trait;
use onthisday_feed_models::{Category, FailureReason, FetchOutcome, MonthDay, Record, SourceLink};
use serde::Deserialize;

use crate::{CategorySource, FeedError};

/// Default Wikimedia feed root for the English edition.
pub const DEFAULT_BASE_URL: &str = "https://api.wikimedia.org/feed/v1/wikipedia/en/onthisday";

/// Upstream lists run to hundreds of entries on busy days; responses are
/// capped to keep aggregates chat-sized.
pub const MAX_RECORDS_PER_CATEGORY: usize = 20;

const USER_AGENT: &str = "onthisday-feed/0.1";

/// Tuning for the Wikimedia client.
#[derive(Debug, Clone)]
pub struct WikimediaConfig {
    /// Feed root URL, without a trailing slash.
    pub base_url: String,
    /// Budget for one request, connection setup through body.
    pub request_timeout: Duration,
    /// Budget for establishing a connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub max_idle_per_host: usize,
    /// Maximum records decoded per category.
    pub records_per_category: usize,
}

impl Default for WikimediaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
            max_idle_per_host: 5,
            records_per_category: MAX_RECORDS_PER_CATEGORY,
        }
    }
}

/// [`CategorySource`] backed by the Wikimedia feed API.
pub struct WikimediaSource {
    client: reqwest::Client,
    config: WikimediaConfig,
}

impl WikimediaSource {
    /// Builds a source with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::ClientBuild`] if the client cannot be
    /// constructed.
    pub fn new(config: WikimediaConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a source over an existing client, for callers sharing one
    /// connection pool process-wide.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: WikimediaConfig) -> Self {
        Self { client, config }
    }

    fn category_url(&self, category: Category, date: MonthDay) -> String {
        format!(
            "{}/{}/{:02}/{:02}",
            self.config.base_url,
            category.api_segment(),
            date.month(),
            date.day()
        )
    }

    async fn fetch_records(
        &self,
        category: Category,
        date: MonthDay,
    ) -> Result<Vec<Record>, FailureReason> {
        let url = self.category_url(category, date);

        let response = self.client.get(&url).send().await.map_err(|e| {
            let reason = classify(&e);
            log::warn!("{category} request failed ({reason}): {e}\n  url: {url}");
            reason
        })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Upstream returned HTTP {status} for {url}");
            return Err(FailureReason::Transport);
        }

        let feed = response.json::<WireFeed>().await.map_err(|e| {
            let reason = classify(&e);
            log::warn!("{category} response unusable ({reason}): {e}\n  url: {url}");
            reason
        })?;

        Ok(records_from_feed(
            feed,
            category,
            self.config.records_per_category,
        ))
    }
}

#[async_trait]
impl CategorySource for WikimediaSource {
    async fn fetch(&self, category: Category, date: MonthDay) -> FetchOutcome {
        match self.fetch_records(category, date).await {
            Ok(records) => FetchOutcome::Success(records),
            Err(reason) => FetchOutcome::Failure(reason),
        }
    }
}

fn classify(error: &reqwest::Error) -> FailureReason {
    if error.is_timeout() {
        FailureReason::Timeout
    } else if error.is_decode() {
        FailureReason::Decode
    } else {
        FailureReason::Transport
    }
}

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// The slice of the upstream response body the feed model needs. Each
/// endpoint fills exactly one list; the rest stay empty.
#[derive(Debug, Default, Deserialize)]
struct WireFeed {
    #[serde(default)]
    events: Vec<WireEntry>,
    #[serde(default)]
    births: Vec<WireEntry>,
    #[serde(default)]
    deaths: Vec<WireEntry>,
    #[serde(default)]
    holidays: Vec<WireEntry>,
}

impl WireFeed {
    fn into_entries(self, category: Category) -> Vec<WireEntry> {
        match category {
            Category::Events => self.events,
            Category::Births => self.births,
            Category::Deaths => self.deaths,
            Category::Holidays => self.holidays,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireEntry {
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    pages: Vec<WirePage>,
}

#[derive(Debug, Deserialize)]
struct WirePage {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    displaytitle: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    thumbnail: Option<WireImage>,
    #[serde(default)]
    content_urls: Option<WireContentUrls>,
}

#[derive(Debug, Deserialize)]
struct WireImage {
    source: String,
}

#[derive(Debug, Deserialize)]
struct WireContentUrls {
    #[serde(default)]
    desktop: Option<WirePageUrl>,
}

#[derive(Debug, Deserialize)]
struct WirePageUrl {
    page: String,
}

fn records_from_feed(feed: WireFeed, category: Category, cap: usize) -> Vec<Record> {
    feed.into_entries(category)
        .into_iter()
        .filter_map(record_from_entry)
        .take(cap)
        .collect()
}

/// Maps one upstream entry to a record. Entries without text carry
/// nothing a consumer can show and are dropped.
fn record_from_entry(entry: WireEntry) -> Option<Record> {
    let headline = entry.text.filter(|text| !text.is_empty())?;

    let mut detail = None;
    let mut thumbnail_url = None;
    let mut source_links = Vec::new();
    for page in entry.pages {
        let title = page.displaytitle.or(page.title);
        let url = page
            .content_urls
            .and_then(|urls| urls.desktop)
            .map(|desktop| desktop.page);
        if detail.is_none() {
            detail = page.extract.filter(|extract| !extract.is_empty());
        }
        if thumbnail_url.is_none() {
            thumbnail_url = page.thumbnail.map(|image| image.source);
        }
        if let (Some(title), Some(url)) = (title, url) {
            source_links.push(SourceLink { title, url });
        }
    }

    Some(Record {
        year: entry.year,
        headline,
        detail,
        source_links,
        thumbnail_url,
        id: None,
        era: None,
        time_ago: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(category: Category, body: serde_json::Value, cap: usize) -> Vec<Record> {
        let feed: WireFeed = serde_json::from_value(body).unwrap();
        records_from_feed(feed, category, cap)
    }

    #[test]
    fn decodes_full_entry() {
        let body = serde_json::json!({
            "events": [{
                "year": 1969,
                "text": "Apollo 11 lands on the Moon.",
                "pages": [{
                    "title": "Apollo 11",
                    "displaytitle": "Apollo 11",
                    "extract": "Apollo 11 was the first crewed Moon landing.",
                    "thumbnail": { "source": "https://upload.wikimedia.org/apollo.jpg" },
                    "content_urls": {
                        "desktop": { "page": "https://en.wikipedia.org/wiki/Apollo_11" }
                    }
                }]
            }]
        });

        let records = decode(Category::Events, body, 20);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.year, Some(1969));
        assert_eq!(record.headline, "Apollo 11 lands on the Moon.");
        assert_eq!(
            record.detail.as_deref(),
            Some("Apollo 11 was the first crewed Moon landing.")
        );
        assert_eq!(
            record.thumbnail_url.as_deref(),
            Some("https://upload.wikimedia.org/apollo.jpg")
        );
        assert_eq!(record.source_links.len(), 1);
        assert_eq!(record.source_links[0].title, "Apollo 11");
        assert_eq!(
            record.source_links[0].url,
            "https://en.wikipedia.org/wiki/Apollo_11"
        );
        assert_eq!(record.id, None);
        assert_eq!(record.era, None);
        assert_eq!(record.time_ago, None);
    }

    #[test]
    fn caps_record_count() {
        let entries = (0..30)
            .map(|i| serde_json::json!({ "year": 1900 + i, "text": format!("Event {i}") }))
            .collect::<Vec<_>>();
        let records = decode(Category::Events, serde_json::json!({ "events": entries }), 20);
        assert_eq!(records.len(), 20);
        assert_eq!(records[0].year, Some(1900));
        assert_eq!(records[19].year, Some(1919));
    }

    #[test]
    fn tolerates_missing_fields() {
        let body = serde_json::json!({
            "holidays": [{ "text": "May Day" }]
        });
        let records = decode(Category::Holidays, body, 20);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, None);
        assert_eq!(records[0].detail, None);
        assert!(records[0].source_links.is_empty());
        assert!(records[0].thumbnail_url.is_none());
    }

    #[test]
    fn drops_entries_without_text() {
        let body = serde_json::json!({
            "events": [
                { "year": 1000 },
                { "year": 1001, "text": "" },
                { "year": 1002, "text": "Kept" }
            ]
        });
        let records = decode(Category::Events, body, 20);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].headline, "Kept");
    }

    #[test]
    fn reads_only_the_requested_category() {
        let body = serde_json::json!({
            "selected": [{ "text": "Editor pick" }],
            "events": [{ "year": 1971, "text": "An event" }]
        });
        assert_eq!(decode(Category::Events, body.clone(), 20).len(), 1);
        assert!(decode(Category::Births, body, 20).is_empty());
    }

    #[test]
    fn first_thumbnail_and_extract_win_across_pages() {
        let body = serde_json::json!({
            "births": [{
                "year": 1912,
                "text": "Birth of a mathematician.",
                "pages": [
                    {
                        "title": "First page",
                        "content_urls": { "desktop": { "page": "https://example.org/first" } }
                    },
                    {
                        "title": "Second page",
                        "extract": "Second page extract.",
                        "thumbnail": { "source": "https://example.org/second.jpg" }
                    }
                ]
            }]
        });
        let records = decode(Category::Births, body, 20);
        let record = &records[0];
        assert_eq!(record.detail.as_deref(), Some("Second page extract."));
        assert_eq!(
            record.thumbnail_url.as_deref(),
            Some("https://example.org/second.jpg")
        );
        // Only the page with a resolvable URL becomes a link.
        assert_eq!(record.source_links.len(), 1);
        assert_eq!(record.source_links[0].url, "https://example.org/first");
    }

    #[test]
    fn decoded_records_serialize_without_enrichment_fields() {
        let body = serde_json::json!({
            "events": [{
                "year": 1969,
                "text": "Apollo 11 lands on the Moon.",
                "pages": [{
                    "title": "Apollo 11",
                    "thumbnail": { "source": "https://upload.wikimedia.org/apollo.jpg" },
                    "content_urls": {
                        "desktop": { "page": "https://en.wikipedia.org/wiki/Apollo_11" }
                    }
                }]
            }]
        });
        let records = decode(Category::Events, body, 20);
        let value = serde_json::to_value(&records[0]).unwrap();

        assert!(value.get("id").is_none());
        assert!(value.get("era").is_none());
        assert!(value.get("timeAgo").is_none());
        assert_eq!(value["thumbnailUrl"], "https://upload.wikimedia.org/apollo.jpg");
        assert_eq!(
            value["sourceLinks"][0]["url"],
            "https://en.wikipedia.org/wiki/Apollo_11"
        );
    }

    #[test]
    fn url_shape_is_zero_padded() {
        let source =
            WikimediaSource::with_client(reqwest::Client::new(), WikimediaConfig::default());
        let url = source.category_url(Category::Deaths, MonthDay::new(3, 7).unwrap());
        assert_eq!(
            url,
            "https://api.wikimedia.org/feed/v1/wikipedia/en/onthisday/deaths/03/07"
        );
    }
}
