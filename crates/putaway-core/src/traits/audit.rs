use crate::errors::StorageError;
use crate::types::AuditEvent;

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent) -> Result<(), StorageError>;
}

/// Drops every event. Used when audit logging is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAuditSink;

impl AuditSink for NoOpAuditSink {
    fn record(&self, _event: AuditEvent) -> Result<(), StorageError> {
        Ok(())
    }
}
