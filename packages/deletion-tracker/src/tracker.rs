//! Tracker: wires both loops to one registry and runs them.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = TrackerConfig::from_env()?;
//! let source = Arc::new(HttpPageSource::new(&config)?);
//! let sink = Arc::new(FileAuditSink::new(&config.audit_log_path));
//!
//! let handle = Tracker::new(config, source, sink).spawn(CancellationToken::new())?;
//! tokio::signal::ctrl_c().await?;
//! handle.shutdown_and_join().await?;
//! ```

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::pipeline::{DeletionLoop, DiscoveryLoop};
use crate::registry::TrackedRegistry;
use crate::scheduling::IntervalTicker;
use crate::traits::audit::AuditSink;
use crate::traits::page_source::PageSource;
use crate::traits::ticker::Ticker;
use crate::types::config::TrackerConfig;

/// Owns the registry and the collaborators shared by both loops.
pub struct Tracker {
    config: TrackerConfig,
    registry: Arc<TrackedRegistry>,
    source: Arc<dyn PageSource>,
    sink: Arc<dyn AuditSink>,
}

impl Tracker {
    /// Create a tracker with an empty registry.
    pub fn new(
        config: TrackerConfig,
        source: Arc<dyn PageSource>,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            config,
            registry: Arc::new(TrackedRegistry::new()),
            source,
            sink,
        }
    }

    /// Shared handle to the registry both loops use.
    pub fn registry(&self) -> Arc<TrackedRegistry> {
        self.registry.clone()
    }

    pub fn discovery_loop(&self) -> Result<DiscoveryLoop> {
        DiscoveryLoop::new(self.source.clone(), self.registry.clone(), &self.config)
            .context("invalid discovery configuration")
    }

    pub fn deletion_loop(&self) -> DeletionLoop {
        DeletionLoop::new(
            self.source.clone(),
            self.registry.clone(),
            self.sink.clone(),
        )
    }

    /// Spawn both loops paced by wall-clock tickers from the config.
    pub fn spawn(self, shutdown: CancellationToken) -> Result<TrackerHandle> {
        let discovery_ticker = IntervalTicker::new(self.config.discovery_interval())
            .with_jitter(self.config.jitter_max());
        let deletion_ticker = IntervalTicker::new(self.config.deletion_check_interval());
        self.spawn_with_tickers(discovery_ticker, deletion_ticker, shutdown)
    }

    /// Spawn both loops with caller-supplied tickers.
    pub fn spawn_with_tickers(
        self,
        discovery_ticker: impl Ticker + 'static,
        deletion_ticker: impl Ticker + 'static,
        shutdown: CancellationToken,
    ) -> Result<TrackerHandle> {
        let discovery = self.discovery_loop()?;
        let deletion = self.deletion_loop();

        info!(
            sections = self.config.sections.len(),
            discovery_interval_s = self.config.discovery_interval_seconds,
            deletion_interval_s = self.config.deletion_check_interval_seconds,
            freshness_window_min = self.config.freshness_window_minutes,
            "starting tracker"
        );

        let discovery = tokio::spawn(discovery.run(discovery_ticker, shutdown.clone()));
        let deletion = tokio::spawn(deletion.run(deletion_ticker, shutdown.clone()));

        Ok(TrackerHandle {
            registry: self.registry,
            shutdown,
            discovery,
            deletion,
        })
    }
}

/// Running tracker: both loop tasks plus the token that stops them.
pub struct TrackerHandle {
    registry: Arc<TrackedRegistry>,
    shutdown: CancellationToken,
    discovery: JoinHandle<()>,
    deletion: JoinHandle<()>,
}

impl TrackerHandle {
    pub fn registry(&self) -> Arc<TrackedRegistry> {
        self.registry.clone()
    }

    /// Ask both loops to stop at their next suspension point.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wait for both loops to return.
    pub async fn join(self) -> Result<()> {
        let (discovery, deletion) = tokio::join!(self.discovery, self.deletion);
        discovery.context("discovery loop panicked")?;
        deletion.context("deletion loop panicked")?;
        Ok(())
    }

    /// Cancel and wait.
    pub async fn shutdown_and_join(self) -> Result<()> {
        self.shutdown();
        self.join().await
    }
}
