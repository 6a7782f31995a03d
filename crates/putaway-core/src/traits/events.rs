use crate::errors::StorageError;
use crate::types::PartHistory;

/// Read-only source of historical putaway events for the rebuild.
pub trait EventSource: Send + Sync {
    /// Every part's history, events oldest first.
    fn part_histories(&self) -> Result<Vec<PartHistory>, StorageError>;
}
