//! Deletion loop: re-checks tracked posts and audits the ones that vanish.
//!
//! ```text
//! DeletionLoop (every check interval)
//!     │
//!     └─► for each id in TrackedRegistry::snapshot_keys()
//!             ├─► get(id)                          ── absent: skip
//!             ├─► fetch permalink + classify
//!             │       ├─ Live          → nothing
//!             │       ├─ Inconclusive  → keep, retried next cycle
//!             │       └─ Deleted       → remove(id) + AuditSink::record
//! ```

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::pipeline::classify::{classify_fetch, PostStatus};
use crate::registry::TrackedRegistry;
use crate::traits::audit::AuditSink;
use crate::traits::page_source::PageSource;
use crate::traits::ticker::{Tick, Ticker};
use crate::types::audit::AuditRecord;
use crate::types::post::PostRecord;

/// Result of one deletion sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionStats {
    /// Posts re-fetched this cycle
    pub checked: usize,
    pub live: usize,
    pub deleted: usize,
    /// Posts left tracked because the re-fetch failed in transit
    pub inconclusive: usize,
}

/// Long-running re-check of every tracked post.
pub struct DeletionLoop {
    source: Arc<dyn PageSource>,
    registry: Arc<TrackedRegistry>,
    sink: Arc<dyn AuditSink>,
}

impl DeletionLoop {
    pub fn new(
        source: Arc<dyn PageSource>,
        registry: Arc<TrackedRegistry>,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            source,
            registry,
            sink,
        }
    }

    /// Re-fetch one post and classify it. Does not touch the registry.
    pub async fn check_post(&self, post: &PostRecord) -> PostStatus {
        let result = self.source.fetch(&post.permalink).await;
        let status = classify_fetch(&result);

        match (&result, status) {
            (Err(e), PostStatus::Inconclusive) => {
                warn!(post_id = %post.post_id, error = %e, "re-check failed, keeping post tracked");
            }
            (Err(e), PostStatus::Deleted) => {
                debug!(post_id = %post.post_id, status = ?e.status(), "permalink no longer served");
            }
            _ => {}
        }

        status
    }

    /// Check every currently tracked post once.
    ///
    /// Ids are taken from a snapshot, so posts discovered mid-sweep wait
    /// for the next cycle. Returns early (between posts) once `shutdown`
    /// is cancelled.
    pub async fn run_cycle(&self, shutdown: &CancellationToken) -> DeletionStats {
        let mut stats = DeletionStats::default();

        for post_id in self.registry.snapshot_keys() {
            if shutdown.is_cancelled() {
                break;
            }

            // Another pass may have removed it since the snapshot
            let Some(post) = self.registry.get(&post_id) else {
                continue;
            };

            stats.checked += 1;
            match self.check_post(&post).await {
                PostStatus::Live => stats.live += 1,
                PostStatus::Inconclusive => stats.inconclusive += 1,
                PostStatus::Deleted => {
                    if self.record_deletion(&post_id).await {
                        stats.deleted += 1;
                    }
                }
            }
        }

        stats
    }

    /// Stop tracking `post_id` and audit it.
    ///
    /// The registry removal decides ownership: only the caller that
    /// actually removed the entry writes the audit record, so a post is
    /// never audited twice. The record carries the content captured at
    /// discovery. A failed audit write is logged; the post stays removed.
    async fn record_deletion(&self, post_id: &str) -> bool {
        let Some(post) = self.registry.remove(post_id) else {
            return false;
        };

        info!(
            section = %post.section,
            title = %post.title,
            post_id = %post.post_id,
            "post deleted"
        );

        let record = AuditRecord::from_post(&post);
        if let Err(e) = self.sink.record(&record).await {
            error!(post_id = %post.post_id, error = %e, "failed to write audit record");
        }

        true
    }

    /// Run until shutdown: wait for the ticker, then sweep, forever.
    ///
    /// The first sweep happens one tick after start, since nothing is
    /// tracked yet when the process comes up.
    pub async fn run(self, mut ticker: impl Ticker, shutdown: CancellationToken) {
        info!(source = self.source.name(), "deletion loop starting");

        loop {
            if ticker.tick(&shutdown).await == Tick::Shutdown {
                break;
            }

            let stats = self.run_cycle(&shutdown).await;
            info!(
                checked = stats.checked,
                live = stats.live,
                deleted = stats.deleted,
                inconclusive = stats.inconclusive,
                tracked = self.registry.len(),
                "deletion sweep finished"
            );
        }

        info!("deletion loop stopped");
    }
}
