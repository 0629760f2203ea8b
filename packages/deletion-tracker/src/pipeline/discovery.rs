//! Discovery loop: sweeps every section and starts tracking new posts.
//!
//! ```text
//! DiscoveryLoop (every interval + jitter)
//!     │
//!     └─► for each section, in order
//!             ├─► fetch listing (PageSource)      ── failure: log, next section
//!             ├─► PostExtractor (filter + body capture)
//!             └─► TrackedRegistry::insert_if_absent
//! ```

use anyhow::{Context, Result};
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::pipeline::extract::{ListingFilter, PostExtractor};
use crate::registry::TrackedRegistry;
use crate::traits::page_source::PageSource;
use crate::traits::ticker::{Tick, Ticker};
use crate::types::config::TrackerConfig;

/// Result of one discovery sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// Sections whose listing was fetched
    pub sections_scanned: usize,

    /// Sections skipped because the listing fetch failed
    pub sections_failed: usize,

    /// Posts newly added to the registry
    pub posts_inserted: usize,
}

/// Long-running sweep over all configured sections.
pub struct DiscoveryLoop {
    source: Arc<dyn PageSource>,
    registry: Arc<TrackedRegistry>,
    extractor: PostExtractor,
    sections: Vec<String>,
    config: TrackerConfig,
}

impl DiscoveryLoop {
    /// Create a discovery loop over `config.sections`.
    pub fn new(
        source: Arc<dyn PageSource>,
        registry: Arc<TrackedRegistry>,
        config: &TrackerConfig,
    ) -> Result<Self> {
        let permalink_base = Url::parse(&config.permalink_base_url)
            .context("PERMALINK_BASE_URL must be a valid URL")?;
        let filter = ListingFilter::new(permalink_base, config.freshness_window()?);

        Ok(Self {
            extractor: PostExtractor::new(source.clone(), registry.clone(), filter),
            source,
            registry,
            sections: config.sections.clone(),
            config: config.clone(),
        })
    }

    /// Sweep every section once.
    ///
    /// Sections are visited sequentially in configured order. A failure in
    /// one section never affects the others. Returns early (between
    /// sections) once `shutdown` is cancelled.
    pub async fn run_cycle(&self, shutdown: &CancellationToken) -> DiscoveryStats {
        let mut stats = DiscoveryStats::default();

        for section in &self.sections {
            if shutdown.is_cancelled() {
                break;
            }

            let url = match self.config.listing_url(section) {
                Ok(url) => url,
                Err(e) => {
                    warn!(section = %section, error = %e, "cannot build listing URL");
                    stats.sections_failed += 1;
                    continue;
                }
            };
            let listing = match self.source.fetch(url.as_str()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(section = %section, error = %e, "section fetch failed");
                    stats.sections_failed += 1;
                    continue;
                }
            };
            stats.sections_scanned += 1;

            let mut records = self.extractor.extract(section, &listing);
            while let Some(record) = records.next().await {
                let post_id = record.post_id.clone();
                let title = record.title.clone();
                let has_content = record.has_content();
                if self.registry.insert_if_absent(post_id.clone(), record) {
                    stats.posts_inserted += 1;
                    debug!(
                        section = %section,
                        post_id = %post_id,
                        title = %title,
                        has_content,
                        "tracking new post"
                    );
                }
            }
        }

        stats
    }

    /// Run until shutdown: sweep, then wait for the ticker, forever.
    pub async fn run(self, mut ticker: impl Ticker, shutdown: CancellationToken) {
        info!(
            sections = self.sections.len(),
            source = self.source.name(),
            "discovery loop starting"
        );

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            let stats = self.run_cycle(&shutdown).await;
            if stats.posts_inserted > 0 || stats.sections_failed > 0 {
                info!(
                    scanned = stats.sections_scanned,
                    failed = stats.sections_failed,
                    inserted = stats.posts_inserted,
                    tracked = self.registry.len(),
                    "discovery sweep finished"
                );
            } else {
                debug!(scanned = stats.sections_scanned, "discovery sweep finished");
            }

            if ticker.tick(&shutdown).await == Tick::Shutdown {
                break;
            }
        }

        info!("discovery loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockPageSource;
    use crate::types::post::PostRecord;

    fn listing(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| {
                format!(
                    r#"<div class="thing" data-fullname="{id}" data-permalink="/r/s/comments/{id}/"><a class="title">Post {id}</a></div>"#
                )
            })
            .collect()
    }

    fn config(sections: &[&str]) -> TrackerConfig {
        TrackerConfig::default()
            .with_sections(sections.iter().copied())
            .with_listing_base_url("https://board.test")
            .with_permalink_base_url("https://board.test")
    }

    #[tokio::test]
    async fn test_cycle_inserts_new_posts_once() {
        let source = MockPageSource::new()
            .with_html("https://board.test/r/rust/new/", listing(&["t3_a", "t3_b"]));
        let registry = Arc::new(TrackedRegistry::new());
        let discovery =
            DiscoveryLoop::new(Arc::new(source.clone()), registry.clone(), &config(&["rust"]))
                .unwrap();
        let shutdown = CancellationToken::new();

        let first = discovery.run_cycle(&shutdown).await;
        assert_eq!(first.posts_inserted, 2);
        assert_eq!(registry.snapshot_keys(), vec!["t3_a", "t3_b"]);

        let second = discovery.run_cycle(&shutdown).await;
        assert_eq!(second.posts_inserted, 0);
        assert_eq!(registry.len(), 2);
        // Tracked posts are filtered before their bodies are fetched again
        assert_eq!(source.call_count("https://board.test/r/s/comments/t3_a/"), 1);
    }

    #[tokio::test]
    async fn test_failed_section_is_isolated() {
        let source = MockPageSource::new()
            .with_status("https://board.test/r/down/new/", 503)
            .with_timeout("https://board.test/r/slow/new/")
            .with_html("https://board.test/r/up/new/", listing(&["t3_up"]));
        let registry = Arc::new(TrackedRegistry::new());
        let discovery = DiscoveryLoop::new(
            Arc::new(source.clone()),
            registry.clone(),
            &config(&["down", "slow", "up"]),
        )
        .unwrap();

        let stats = discovery.run_cycle(&CancellationToken::new()).await;

        assert_eq!(
            stats,
            DiscoveryStats {
                sections_scanned: 1,
                sections_failed: 2,
                posts_inserted: 1,
            }
        );
        assert!(registry.contains("t3_up"));

        let calls = source.calls();
        let order: Vec<&str> = calls
            .iter()
            .filter(|u| u.ends_with("/new/"))
            .map(String::as_str)
            .collect();
        assert_eq!(
            order,
            vec![
                "https://board.test/r/down/new/",
                "https://board.test/r/slow/new/",
                "https://board.test/r/up/new/",
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_record_is_not_overwritten() {
        let source = MockPageSource::new()
            .with_html("https://board.test/r/rust/new/", listing(&["t3_a"]));
        let registry = Arc::new(TrackedRegistry::new());
        registry.track(PostRecord::new("t3_a", "rust", "Original", "https://board.test/a"));
        let discovery =
            DiscoveryLoop::new(Arc::new(source), registry.clone(), &config(&["rust"])).unwrap();

        let stats = discovery.run_cycle(&CancellationToken::new()).await;

        assert_eq!(stats.posts_inserted, 0);
        assert_eq!(registry.get("t3_a").unwrap().title, "Original");
    }

    #[tokio::test]
    async fn test_cancelled_cycle_skips_remaining_sections() {
        let source = MockPageSource::new();
        let discovery = DiscoveryLoop::new(
            Arc::new(source.clone()),
            Arc::new(TrackedRegistry::new()),
            &config(&["a", "b"]),
        )
        .unwrap();
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let stats = discovery.run_cycle(&shutdown).await;

        assert_eq!(stats, DiscoveryStats::default());
        assert!(source.calls().is_empty());
    }

    #[test]
    fn test_invalid_permalink_base_rejected() {
        let result = DiscoveryLoop::new(
            Arc::new(MockPageSource::new()),
            Arc::new(TrackedRegistry::new()),
            &config(&["a"]).with_permalink_base_url("::nope::"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_freshness_window_rejected() {
        let result = DiscoveryLoop::new(
            Arc::new(MockPageSource::new()),
            Arc::new(TrackedRegistry::new()),
            &config(&["a"]).with_freshness_window_minutes(u64::MAX),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_huge_freshness_window_keeps_every_entry() {
        // Accepted by the loop constructor but larger than any real cutoff
        let config = config(&["rust"]).with_freshness_window_minutes(i64::MAX as u64 / 60_000);
        let source = MockPageSource::new()
            .with_html("https://board.test/r/rust/new/", listing(&["t3_a"]));
        let registry = Arc::new(TrackedRegistry::new());
        let discovery = DiscoveryLoop::new(Arc::new(source), registry.clone(), &config).unwrap();

        let stats = discovery.run_cycle(&CancellationToken::new()).await;

        assert_eq!(stats.posts_inserted, 1);
        assert!(registry.contains("t3_a"));
    }

    #[tokio::test]
    async fn test_section_name_is_encoded_in_listing_url() {
        let source = MockPageSource::new()
            .with_html("https://board.test/r/odd%20name/new/", listing(&["t3_odd"]));
        let registry = Arc::new(TrackedRegistry::new());
        let discovery = DiscoveryLoop::new(
            Arc::new(source.clone()),
            registry.clone(),
            &config(&["odd name"]),
        )
        .unwrap();

        let stats = discovery.run_cycle(&CancellationToken::new()).await;

        assert_eq!(stats.sections_scanned, 1);
        assert!(registry.contains("t3_odd"));
    }
}
