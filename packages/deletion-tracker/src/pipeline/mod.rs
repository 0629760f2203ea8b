//! Tracking pipeline - the core of the crate.
//!
//! The pipeline covers:
//! - Listing parsing and discovery-time filtering (`extract`)
//! - Live/deleted classification of re-fetched posts (`classify`)
//! - The discovery loop (`discovery`)
//! - The deletion loop (`deletion`)

pub mod classify;
pub mod deletion;
pub mod discovery;
pub mod extract;
pub mod markup;

pub use classify::{classify_fetch, classify_page, classify_text, normalize, PostStatus};
pub use deletion::{DeletionLoop, DeletionStats};
pub use discovery::{DiscoveryLoop, DiscoveryStats};
pub use extract::{ListingFilter, PostExtractor, PostStream, Rejection};
