//! Audit sink trait for deletion events.

use async_trait::async_trait;

use crate::error::AuditResult;
use crate::types::audit::AuditRecord;

/// Append-only destination for deletion records.
///
/// Implementations must write each record as a unit: two concurrent calls
/// may land in either order, but never interleave their lines.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one record.
    async fn record(&self, record: &AuditRecord) -> AuditResult<()>;
}
