//! Core trait abstractions.
//!
//! - [`page_source::PageSource`] - fetch pages (network seam)
//! - [`audit::AuditSink`] - append deletion records
//! - [`ticker::Ticker`] - pace the loops

pub mod audit;
pub mod page_source;
pub mod ticker;
