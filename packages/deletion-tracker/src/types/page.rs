//! Fetched page type returned by page sources.

use chrono::{DateTime, Utc};
use scraper::Html;
use serde::{Deserialize, Serialize};

/// A page as returned by a [`PageSource`](crate::traits::page_source::PageSource).
///
/// Holds the raw markup rather than a parsed tree: `scraper::Html` is not
/// `Send`, so it is built on demand with [`Page::document`] inside
/// synchronous parsing code and never held across an `.await`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// URL that was requested
    pub url: String,

    /// HTTP status code of the response
    pub status: u16,

    /// Raw HTML body
    pub body: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    /// Create a successful (200) page.
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Set the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body into an HTML document.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}
