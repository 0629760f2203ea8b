//! Post extractor: turns a section listing into tracking candidates.
//!
//! Listing parsing is synchronous and works on borrowed HTML; only the
//! per-candidate body fetch is async. Candidates are yielded lazily, one
//! body fetch at a time, so a consumer can insert each record as soon as
//! it is ready.

use async_stream::stream;
use chrono::{DateTime, Duration, Utc};
use futures::Stream;
use scraper::{ElementRef, Html};
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::error::{ParseError, ParseResult};
use crate::pipeline::markup::{self, PROMOTED_CLASS, THING, TIME, TITLE_LINK};
use crate::registry::TrackedRegistry;
use crate::traits::page_source::PageSource;
use crate::types::page::Page;
use crate::types::post::{ListingEntry, PostRecord};

/// Stream of extracted records.
pub type PostStream<'a> = Pin<Box<dyn Stream<Item = PostRecord> + Send + 'a>>;

/// Why a listing entry was not turned into a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Promoted,
    AlreadyTracked,
    Stale { created_at: DateTime<Utc> },
    Invalid(ParseError),
}

/// Discovery-time filters applied to a listing.
#[derive(Debug, Clone)]
pub struct ListingFilter {
    /// Host that relative permalinks resolve against
    pub permalink_base: Url,
    /// Maximum age of a post at discovery
    pub freshness_window: Duration,
}

impl ListingFilter {
    pub fn new(permalink_base: Url, freshness_window: Duration) -> Self {
        Self {
            permalink_base,
            freshness_window,
        }
    }

    /// Evaluate every entry of a listing against the filters.
    ///
    /// Entries keep their listing order. `is_tracked` is consulted per
    /// entry, never while parsing holds anything but the HTML.
    pub fn evaluate(
        &self,
        html: &str,
        now: DateTime<Utc>,
        is_tracked: impl Fn(&str) -> bool,
    ) -> Vec<Result<ListingEntry, Rejection>> {
        let document = Html::parse_document(html);
        // A window reaching past the representable range excludes nothing
        let cutoff = now
            .checked_sub_signed(self.freshness_window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        document
            .select(&THING)
            .map(|node| self.evaluate_node(node, cutoff, &is_tracked))
            .collect()
    }

    /// Entries that passed every filter.
    pub fn candidates(
        &self,
        html: &str,
        now: DateTime<Utc>,
        is_tracked: impl Fn(&str) -> bool,
    ) -> Vec<ListingEntry> {
        self.evaluate(html, now, is_tracked)
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }

    fn evaluate_node(
        &self,
        node: ElementRef<'_>,
        cutoff: DateTime<Utc>,
        is_tracked: &impl Fn(&str) -> bool,
    ) -> Result<ListingEntry, Rejection> {
        let element = node.value();

        if element.classes().any(|c| c == PROMOTED_CLASS) {
            return Err(Rejection::Promoted);
        }

        let post_id = non_blank(element.attr("data-fullname"))
            .ok_or(Rejection::Invalid(ParseError::MissingField("data-fullname")))?;
        if is_tracked(post_id) {
            return Err(Rejection::AlreadyTracked);
        }

        // A missing timestamp means unknown age, which is kept
        let created_at = created_at(node).map_err(Rejection::Invalid)?;
        if let Some(created_at) = created_at {
            if created_at < cutoff {
                return Err(Rejection::Stale { created_at });
            }
        }

        let title = node
            .select(&TITLE_LINK)
            .next()
            .map(markup::element_text)
            .filter(|t| !t.is_empty())
            .ok_or(Rejection::Invalid(ParseError::MissingField("title")))?;

        let permalink = non_blank(element.attr("data-permalink"))
            .and_then(|path| self.permalink_base.join(path).ok())
            .ok_or(Rejection::Invalid(ParseError::MissingField("data-permalink")))?;

        Ok(ListingEntry {
            post_id: post_id.to_string(),
            title,
            permalink: permalink.to_string(),
            created_at,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Creation time from the entry's `<time datetime="...">`.
fn created_at(node: ElementRef<'_>) -> ParseResult<Option<DateTime<Utc>>> {
    let Some(raw) = node
        .select(&TIME)
        .find_map(|t| t.value().attr("datetime"))
    else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| ParseError::InvalidTimestamp(raw.to_string()))
}

/// Extracts tracking candidates from listings and captures their bodies.
pub struct PostExtractor {
    source: Arc<dyn PageSource>,
    registry: Arc<TrackedRegistry>,
    filter: ListingFilter,
}

impl PostExtractor {
    pub fn new(
        source: Arc<dyn PageSource>,
        registry: Arc<TrackedRegistry>,
        filter: ListingFilter,
    ) -> Self {
        Self {
            source,
            registry,
            filter,
        }
    }

    /// Lazily yield records for every fresh, untracked, well-formed entry
    /// in `listing`.
    ///
    /// Each record's body is fetched from its permalink as it is pulled
    /// from the stream. A failed body fetch still yields the record, with
    /// empty content.
    pub fn extract<'a>(&'a self, section: &'a str, listing: &Page) -> PostStream<'a> {
        self.extract_at(section, listing, Utc::now())
    }

    /// [`extract`](Self::extract) with an explicit "now".
    pub fn extract_at<'a>(
        &'a self,
        section: &'a str,
        listing: &Page,
        now: DateTime<Utc>,
    ) -> PostStream<'a> {
        let mut candidates = Vec::new();
        for outcome in self
            .filter
            .evaluate(&listing.body, now, |id| self.registry.contains(id))
        {
            match outcome {
                Ok(entry) => candidates.push(entry),
                Err(Rejection::Invalid(reason)) => {
                    debug!(section = %section, reason = %reason, "skipping malformed listing entry");
                }
                Err(rejection) => {
                    debug!(section = %section, ?rejection, "skipping listing entry");
                }
            }
        }

        debug!(section = %section, candidates = candidates.len(), "listing parsed");

        Box::pin(stream! {
            for entry in candidates {
                let content = self.capture_body(&entry.permalink).await;
                yield entry.into_record(section, content).with_discovered_at(now);
            }
        })
    }

    /// Best-effort body capture; any failure yields empty content.
    async fn capture_body(&self, permalink: &str) -> String {
        match self.source.fetch(permalink).await {
            Ok(page) => markup::body_text(&page.document()).unwrap_or_default(),
            Err(e) => {
                debug!(url = %permalink, error = %e, "body capture failed");
                String::new()
            }
        }
    }
}
