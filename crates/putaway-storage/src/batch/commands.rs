//! BatchCommand enum: all write operations that can be batched.

use putaway_core::types::{AuditEvent, PlacementEvent};

/// A command sent to the batch writer thread.
#[derive(Debug)]
pub enum BatchCommand {
    /// Append audit log records.
    InsertAudit(Vec<AuditEvent>),
    /// Append placement events.
    InsertEvents(Vec<PlacementEvent>),
    /// Flush any pending writes immediately.
    Flush,
    /// Shut down the writer thread.
    Shutdown,
}
