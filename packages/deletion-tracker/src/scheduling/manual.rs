//! Test ticker driven by hand.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::traits::ticker::{Tick, Ticker};

/// Ticker that only advances when its [`ManualTickerHandle`] says so.
///
/// Every call to [`Ticker::tick`] first reports "parked" to the handle,
/// so a test can wait for a cycle to finish before asserting on it.
pub struct ManualTicker {
    ticks: mpsc::UnboundedReceiver<()>,
    parked: mpsc::UnboundedSender<()>,
}

/// Test-side controller for a [`ManualTicker`].
pub struct ManualTickerHandle {
    ticks: mpsc::UnboundedSender<()>,
    parked: mpsc::UnboundedReceiver<()>,
}

/// Create a connected ticker/handle pair.
pub fn manual_ticker() -> (ManualTicker, ManualTickerHandle) {
    let (tick_tx, tick_rx) = mpsc::unbounded_channel();
    let (parked_tx, parked_rx) = mpsc::unbounded_channel();
    (
        ManualTicker {
            ticks: tick_rx,
            parked: parked_tx,
        },
        ManualTickerHandle {
            ticks: tick_tx,
            parked: parked_rx,
        },
    )
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self, shutdown: &CancellationToken) -> Tick {
        let _ = self.parked.send(());
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => Tick::Shutdown,
            tick = self.ticks.recv() => match tick {
                Some(()) => Tick::Continue,
                // Handle dropped: nothing will ever release the loop again
                None => Tick::Shutdown,
            },
        }
    }
}

impl ManualTickerHandle {
    /// Wait until the loop is parked at its ticker.
    ///
    /// Returns false if the loop has exited.
    pub async fn parked(&mut self) -> bool {
        self.parked.recv().await.is_some()
    }

    /// Release the loop for one more cycle without waiting.
    pub fn release(&self) -> bool {
        self.ticks.send(()).is_ok()
    }

    /// Release one cycle and wait for it to complete.
    pub async fn step(&mut self) -> bool {
        self.release() && self.parked().await
    }
}
