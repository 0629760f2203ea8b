//! Post types: listing candidates and tracked records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of one discovered post.
///
/// Title and content are captured once at discovery and never refreshed;
/// the deletion audit reports what the post said when it was first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Board-assigned identifier (e.g. `t3_abc123`)
    pub post_id: String,

    /// Section the post was discovered in
    pub section: String,

    /// Title at discovery time
    pub title: String,

    /// Absolute URL used for re-checking
    pub permalink: String,

    /// Body text at discovery time (empty if capture failed)
    #[serde(default)]
    pub content: String,

    /// First observation
    pub discovered_at: DateTime<Utc>,
}

impl PostRecord {
    /// Create a record with empty content, discovered now.
    pub fn new(
        post_id: impl Into<String>,
        section: impl Into<String>,
        title: impl Into<String>,
        permalink: impl Into<String>,
    ) -> Self {
        Self {
            post_id: post_id.into(),
            section: section.into(),
            title: title.into(),
            permalink: permalink.into(),
            content: String::new(),
            discovered_at: Utc::now(),
        }
    }

    /// Set the captured body content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the discovery timestamp.
    pub fn with_discovered_at(mut self, discovered_at: DateTime<Utc>) -> Self {
        self.discovered_at = discovered_at;
        self
    }

    /// Whether any body content was captured.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// A listing entry that passed every discovery-time filter.
///
/// Becomes a [`PostRecord`] once its body has been fetched (or failed to).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub post_id: String,
    pub title: String,
    pub permalink: String,
    /// `None` when the listing carried no timestamp
    pub created_at: Option<DateTime<Utc>>,
}

impl ListingEntry {
    /// Turn this entry into a tracked record.
    pub fn into_record(self, section: &str, content: String) -> PostRecord {
        PostRecord {
            post_id: self.post_id,
            section: section.to_string(),
            title: self.title,
            permalink: self.permalink,
            content,
            discovered_at: Utc::now(),
        }
    }
}
