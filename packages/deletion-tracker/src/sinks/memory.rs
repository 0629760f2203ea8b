//! In-memory audit sink for testing and development.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::AuditResult;
use crate::traits::audit::AuditSink;
use crate::types::audit::AuditRecord;

/// Collects audit records in memory.
///
/// Clones share the same buffer, so a test can keep a handle while the
/// deletion loop owns another.
#[derive(Default, Clone)]
pub struct MemoryAuditSink {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records written so far, in order.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: &AuditRecord) -> AuditResult<()> {
        self.records.write().unwrap().push(record.clone());
        Ok(())
    }
}
