use std::sync::Arc;

use putaway_core::errors::StorageError;
use putaway_core::traits::AuditSink;
use putaway_core::types::AuditEvent;

use crate::batch::{BatchCommand, BatchWriter, WriteStats};
use crate::connection::DatabaseManager;
use crate::queries::audit;

enum Mode {
    Direct(Arc<DatabaseManager>),
    Batched(BatchWriter),
}

/// Audit log backed by `audit_log`, written either inline on the writer
/// connection or through the background batch writer.
pub struct SqliteAuditSink {
    mode: Mode,
}

impl SqliteAuditSink {
    pub fn direct(db: Arc<DatabaseManager>) -> Self {
        Self {
            mode: Mode::Direct(db),
        }
    }

    /// Requires a file-backed database.
    pub fn batched(db: &DatabaseManager) -> Result<Self, StorageError> {
        let writer = BatchWriter::new(db.open_batch_connection()?)?;
        Ok(Self {
            mode: Mode::Batched(writer),
        })
    }

    /// Push buffered records out. Non-blocking for the batched mode.
    pub fn flush(&self) -> Result<(), StorageError> {
        match &self.mode {
            Mode::Direct(_) => Ok(()),
            Mode::Batched(writer) => writer.flush(),
        }
    }

    /// Stop the batch writer, waiting for pending records.
    pub fn shutdown(self) -> Result<WriteStats, StorageError> {
        match self.mode {
            Mode::Direct(_) => Ok(WriteStats::default()),
            Mode::Batched(writer) => writer.shutdown(),
        }
    }
}

impl AuditSink for SqliteAuditSink {
    fn record(&self, event: AuditEvent) -> Result<(), StorageError> {
        match &self.mode {
            Mode::Direct(db) => {
                db.with_writer(|conn| audit::insert_audit_events(conn, std::slice::from_ref(&event)))?;
                Ok(())
            }
            Mode::Batched(writer) => writer.send(BatchCommand::InsertAudit(vec![event])),
        }
    }
}

impl std::fmt::Debug for SqliteAuditSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.mode {
            Mode::Direct(_) => "direct",
            Mode::Batched(_) => "batched",
        };
        f.debug_struct("SqliteAuditSink").field("mode", &mode).finish()
    }
}
