use std::sync::Arc;

use putaway_core::errors::StorageError;
use putaway_core::traits::EventSource;
use putaway_core::types::{PartHistory, PlacementEvent};

use crate::connection::{with_immediate_transaction, DatabaseManager};
use crate::queries::{events, parts};

/// Historical putaway events read from `putaway_events`.
#[derive(Debug, Clone)]
pub struct SqliteEventSource {
    db: Arc<DatabaseManager>,
}

impl SqliteEventSource {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Append events in one transaction.
    pub fn record_events(&self, batch: &[PlacementEvent]) -> Result<usize, StorageError> {
        self.db
            .with_writer(|conn| with_immediate_transaction(conn, |tx| events::insert_events(tx, batch)))
    }

    pub fn part_ids(&self) -> Result<Vec<i64>, StorageError> {
        self.db.with_reader(parts::part_ids_with_events)
    }
}

impl EventSource for SqliteEventSource {
    fn part_histories(&self) -> Result<Vec<PartHistory>, StorageError> {
        self.db.with_reader(events::load_part_histories)
    }
}
