//! Typed errors for the tracker.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can
//! pattern-match on what went wrong. None of these are fatal to the
//! discovery or deletion loops; they are logged and the current item or
//! section is skipped.

use thiserror::Error;

/// Errors returned by a [`PageSource`](crate::traits::page_source::PageSource).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered, but not with a success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request did not complete within the configured timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Connection, TLS or protocol failure
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The response body could not be read
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// URL could not be built or parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl FetchError {
    /// Build a network error from any error type.
    pub fn network(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Network {
            url: url.into(),
            source: source.into(),
        }
    }

    /// True when the server gave a definitive (non-success) answer.
    ///
    /// Everything else is a transport failure and says nothing about
    /// whether the page still exists.
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// The HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Reasons a listing entry could not be turned into a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required attribute or element is missing or blank
    #[error("listing entry missing {0}")]
    MissingField(&'static str),

    /// The entry's timestamp is present but not ISO-8601
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Errors writing to an [`AuditSink`](crate::traits::audit::AuditSink).
#[derive(Debug, Error)]
pub enum AuditError {
    /// Underlying file or stream write failed
    #[error("audit write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for listing parsing.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for audit writes.
pub type AuditResult<T> = std::result::Result<T, AuditError>;
