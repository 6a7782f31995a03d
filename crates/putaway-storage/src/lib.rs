//! # putaway-storage
//!
//! SQLite persistence for the putaway engine.
//! WAL mode, write-serialized + read-pooled, schema migrations,
//! the pattern store, the availability oracle, and the audit batch writer.

pub mod batch;
pub mod connection;
pub mod migrations;
pub mod queries;
pub mod stores;

pub use batch::BatchWriter;
pub use connection::DatabaseManager;
pub use stores::{
    CachedPatternStore, InMemoryPatternStore, SqliteAuditSink, SqliteAvailabilityOracle,
    SqliteEventSource, SqlitePatternStore,
};

use putaway_core::errors::StorageError;

pub(crate) fn sql_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}
