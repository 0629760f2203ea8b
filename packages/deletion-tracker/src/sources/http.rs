//! HTTP page source backed by reqwest.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::error::{FetchError, FetchResult};
use crate::traits::page_source::PageSource;
use crate::types::config::TrackerConfig;
use crate::types::page::Page;

/// Fetches pages over HTTP with a fixed identity and a bounded timeout.
///
/// The client is built once and shared by both loops; reqwest pools
/// connections internally.
#[derive(Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    /// Build a source from the tracker configuration.
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .parse()
                .context("invalid Accept header")?,
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            config
                .accept_language
                .parse()
                .context("ACCEPT_LANGUAGE is not a valid header value")?,
        );

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    fn map_send_error(url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if e.is_builder() {
            FetchError::InvalidUrl {
                url: url.to_string(),
            }
        } else {
            FetchError::network(url, e)
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> FetchResult<Page> {
        debug!(url = %url, "HTTP fetch starting");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::map_send_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: Box::new(e),
                }
            }
        })?;

        Ok(Page {
            url: url.to_string(),
            status: status.as_u16(),
            body,
            fetched_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
