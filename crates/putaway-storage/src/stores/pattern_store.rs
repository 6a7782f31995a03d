use std::sync::Arc;

use chrono::Utc;
use putaway_core::errors::StorageError;
use putaway_core::traits::PatternStore;
use putaway_core::types::PartPattern;
use tracing::info;

use crate::connection::{with_immediate_transaction, DatabaseManager};
use crate::queries::patterns;

/// Patterns persisted in `part_patterns`. Replacement is a single
/// DELETE+INSERT transaction, so WAL readers see the old set or the new one.
#[derive(Debug, Clone)]
pub struct SqlitePatternStore {
    db: Arc<DatabaseManager>,
}

impl SqlitePatternStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        self.db.with_reader(patterns::count_patterns)
    }

    pub fn load_all(&self) -> Result<Vec<PartPattern>, StorageError> {
        self.db.with_reader(patterns::load_all_patterns)
    }
}

impl PatternStore for SqlitePatternStore {
    fn get(&self, part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError> {
        Ok(self
            .db
            .with_reader(|conn| patterns::get_pattern(conn, part_id))?
            .map(Arc::new))
    }

    fn put_batch(&self, records: Vec<PartPattern>) -> Result<usize, StorageError> {
        let rebuilt_at = Utc::now();
        let written = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| patterns::replace_patterns(tx, &records, rebuilt_at))
        })?;
        info!(written, "pattern set replaced");
        Ok(written)
    }
}
