//! Deletion audit record.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

use super::post::PostRecord;

/// Timestamp layout used in the audit log.
pub const AUDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One deletion event, written once and never replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    /// When the deletion was detected (local process time)
    pub timestamp: DateTime<Local>,
    pub section: String,
    pub title: String,
    pub permalink: String,
    pub content: String,
}

impl AuditRecord {
    /// Build a record from the captured snapshot, stamped now.
    pub fn from_post(post: &PostRecord) -> Self {
        Self::at(post, Local::now())
    }

    /// Build a record with an explicit detection time.
    pub fn at(post: &PostRecord, timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            section: post.section.clone(),
            title: post.title.clone(),
            permalink: post.permalink.clone(),
            content: post.content.clone(),
        }
    }
}

/// Renders the multi-line log entry, including the trailing blank line.
impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} - r/{} - {}",
            self.timestamp.format(AUDIT_TIMESTAMP_FORMAT),
            self.section,
            self.title
        )?;
        writeln!(f, "Link: {}", self.permalink)?;
        writeln!(f, "Content: {}", self.content)?;
        writeln!(f)
    }
}
