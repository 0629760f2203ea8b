//! Wall-clock ticker with jitter.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::traits::ticker::{Tick, Ticker};

/// Sleeps a base interval plus a uniform random jitter between cycles.
///
/// Only the discovery loop is given jitter.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    base: Duration,
    jitter_max: Duration,
}

impl IntervalTicker {
    /// Fixed interval, no jitter.
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            jitter_max: Duration::ZERO,
        }
    }

    /// Add up to `jitter_max` of random delay to every wait.
    pub fn with_jitter(mut self, jitter_max: Duration) -> Self {
        self.jitter_max = jitter_max;
        self
    }

    /// Next delay: base plus a fresh jitter sample.
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = self.jitter_max.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.base + Duration::from_millis(extra)
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self, shutdown: &CancellationToken) -> Tick {
        let delay = self.next_delay();
        tokio::select! {
            _ = shutdown.cancelled() => Tick::Shutdown,
            _ = tokio::time::sleep(delay) => Tick::Continue,
        }
    }
}
