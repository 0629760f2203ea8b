//! Audit sink implementations.

mod file;
mod memory;

pub use file::FileAuditSink;
pub use memory::MemoryAuditSink;

pub use crate::traits::audit::AuditSink;
