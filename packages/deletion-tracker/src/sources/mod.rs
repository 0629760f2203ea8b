//! Page source implementations.
//!
//! # Available Sources
//!
//! - `HttpPageSource` - reqwest client with identity headers and timeout
//! - `MockPageSource` - canned responses for testing

mod http;
mod mock;

pub use http::HttpPageSource;
pub use mock::{MockPageSource, MockResponse};

// Re-export from traits for convenience
pub use crate::traits::page_source::PageSource;
