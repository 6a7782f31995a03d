use std::sync::Arc;

use crate::errors::StorageError;
use crate::types::PartPattern;

/// One aggregated, scored record per part.
pub trait PatternStore: Send + Sync {
    /// Single-key read. `Ok(None)` means the part has no stored pattern.
    fn get(&self, part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError>;

    /// Replace the whole pattern set. Readers see either the old set or the
    /// new one, never a mix. Returns the number of records written.
    fn put_batch(&self, records: Vec<PartPattern>) -> Result<usize, StorageError>;
}

impl<T: PatternStore + ?Sized> PatternStore for Arc<T> {
    fn get(&self, part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError> {
        (**self).get(part_id)
    }

    fn put_batch(&self, records: Vec<PartPattern>) -> Result<usize, StorageError> {
        (**self).put_batch(records)
    }
}
