//! Board Deletion Tracker
//!
//! Watches board sections for newly created posts, snapshots their
//! content, and writes an audit record when a tracked post is later
//! deleted or removed.
//!
//! # Architecture
//!
//! Two loops run concurrently and share nothing but the
//! [`TrackedRegistry`]:
//!
//! - [`DiscoveryLoop`] sweeps every section's "new" listing and starts
//!   tracking fresh posts, exactly once each.
//! - [`DeletionLoop`] re-fetches every tracked post, and on a live →
//!   deleted transition writes one [`AuditRecord`] and stops tracking it.
//!
//! Network access goes through [`PageSource`], audit output through
//! [`AuditSink`], and pacing through [`Ticker`], so every loop can be
//! driven deterministically in tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use deletion_tracker::{FileAuditSink, HttpPageSource, Tracker, TrackerConfig};
//!
//! let config = TrackerConfig::from_env()?;
//! let source = Arc::new(HttpPageSource::new(&config)?);
//! let sink = Arc::new(FileAuditSink::new(&config.audit_log_path));
//! let handle = Tracker::new(config, source, sink).spawn(CancellationToken::new())?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (PageSource, AuditSink, Ticker)
//! - [`types`] - Records, pages and configuration
//! - [`pipeline`] - Extractor, classifier and the two loops
//! - [`registry`] - The shared tracked-post map
//! - [`sources`] - Page source implementations (HTTP, mock)
//! - [`sinks`] - Audit sink implementations (file, memory)
//! - [`scheduling`] - Ticker implementations (interval, manual)

pub mod error;
pub mod pipeline;
pub mod registry;
pub mod scheduling;
pub mod sinks;
pub mod sources;
pub mod tracker;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AuditError, FetchError, ParseError};
pub use pipeline::{
    classify_fetch, classify_page, classify_text, DeletionLoop, DeletionStats, DiscoveryLoop,
    DiscoveryStats, ListingFilter, PostExtractor, PostStatus,
};
pub use registry::TrackedRegistry;
pub use scheduling::{manual_ticker, IntervalTicker, ManualTicker, ManualTickerHandle};
pub use sinks::{FileAuditSink, MemoryAuditSink};
pub use sources::{HttpPageSource, MockPageSource, MockResponse};
pub use tracker::{Tracker, TrackerHandle};
pub use traits::{
    audit::AuditSink,
    page_source::PageSource,
    ticker::{Tick, Ticker},
};
pub use types::{
    audit::AuditRecord,
    config::TrackerConfig,
    page::Page,
    post::{ListingEntry, PostRecord},
};
