//! Ticker implementations.
//!
//! - `IntervalTicker` - real sleeps with jitter (production)
//! - `ManualTicker` - stepped by a test handle

mod interval;
mod manual;

pub use interval::IntervalTicker;
pub use manual::{manual_ticker, ManualTicker, ManualTickerHandle};

pub use crate::traits::ticker::{Tick, Ticker};
