//! Mock page source for testing.
//!
//! Provides a configurable mock implementation of the PageSource trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::page_source::PageSource;
use crate::types::page::Page;

/// Canned outcome for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Successful fetch with this body
    Html(String),
    /// Server answered with a non-success status
    Status(u16),
    /// Request timed out
    Timeout,
    /// Connection failed
    NetworkError(String),
}

/// Mock page source for testing.
///
/// Responses can be swapped while a loop is running (clones share state),
/// which is how tests simulate a post disappearing between cycles. URLs
/// without a canned response fail with a network error.
///
/// # Example
///
/// ```rust
/// use deletion_tracker::sources::MockPageSource;
///
/// let mock = MockPageSource::new()
///     .with_html("https://example.com/r/rust/new/", "<div class=\"thing\"></div>")
///     .with_status("https://example.com/gone", 404);
/// ```
#[derive(Default, Clone)]
pub struct MockPageSource {
    /// Canned responses indexed by URL
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    /// Every URL fetched, in order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockPageSource {
    /// Create a new empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response for a URL.
    pub fn set_response(&self, url: impl Into<String>, response: MockResponse) {
        self.responses.write().unwrap().insert(url.into(), response);
    }

    /// Set a successful HTML response (builder pattern).
    pub fn with_html(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.set_response(url, MockResponse::Html(html.into()));
        self
    }

    /// Set a status response (builder pattern).
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.set_response(url, MockResponse::Status(status));
        self
    }

    /// Make a URL time out (builder pattern).
    pub fn with_timeout(self, url: impl Into<String>) -> Self {
        self.set_response(url, MockResponse::Timeout);
        self
    }

    /// Make a URL fail with a connection error (builder pattern).
    pub fn with_network_error(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.set_response(url, MockResponse::NetworkError(message.into()));
        self
    }

    /// Get all URLs fetched so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Get the number of times a URL was fetched.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|u| *u == url).count()
    }

    /// Clear all recorded calls.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn fetch(&self, url: &str) -> FetchResult<Page> {
        self.calls.write().unwrap().push(url.to_string());

        let response = self.responses.read().unwrap().get(url).cloned();
        match response {
            Some(MockResponse::Html(html)) => Ok(Page::new(url, html)),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(MockResponse::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Some(MockResponse::NetworkError(message)) => Err(FetchError::network(url, message)),
            None => Err(FetchError::network(url, "no mock response configured")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
