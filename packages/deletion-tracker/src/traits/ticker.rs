//! Scheduler seam for the tracker loops.
//!
//! Loops never sleep directly. They ask a [`Ticker`] to wait for the next
//! cycle, which lets tests step a loop one cycle at a time with
//! [`ManualTicker`](crate::scheduling::ManualTicker) instead of relying on
//! wall-clock sleeps.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Outcome of waiting for the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Run another cycle
    Continue,
    /// Shutdown was requested (or the ticker ran dry); the loop should return
    Shutdown,
}

/// Paces a loop between cycles.
#[async_trait]
pub trait Ticker: Send {
    /// Wait until the next cycle is due.
    ///
    /// Must return [`Tick::Shutdown`] promptly once `shutdown` is cancelled.
    async fn tick(&mut self, shutdown: &CancellationToken) -> Tick;
}
