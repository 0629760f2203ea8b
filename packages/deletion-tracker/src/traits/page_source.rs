//! Page source trait: the only way the tracker touches the network.
//!
//! Both loops fetch through this seam, so tests swap in
//! [`MockPageSource`](crate::sources::MockPageSource) and never hit a
//! real board.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::page::Page;

/// Fetches pages by URL.
///
/// Implementations must bound every request by a timeout and report it as
/// [`FetchError::Timeout`](crate::error::FetchError::Timeout) rather than
/// hang. A non-success HTTP status is reported as
/// [`FetchError::Status`](crate::error::FetchError::Status) so callers can
/// tell "the server says it's gone" apart from "we could not reach it".
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a single URL.
    async fn fetch(&self, url: &str) -> FetchResult<Page>;

    /// Get the source name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
