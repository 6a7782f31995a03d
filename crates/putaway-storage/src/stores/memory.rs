use std::sync::{Arc, RwLock};

use putaway_core::errors::StorageError;
use putaway_core::traits::PatternStore;
use putaway_core::types::collections::FxHashMap;
use putaway_core::types::PartPattern;

type Snapshot = Arc<FxHashMap<i64, Arc<PartPattern>>>;

/// Pattern set held in memory. Replacement swaps the whole map under a
/// short write lock; readers clone the current snapshot's `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryPatternStore {
    snapshot: RwLock<Snapshot>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns(patterns: Vec<PartPattern>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(index(patterns))),
        }
    }

    pub fn len(&self) -> usize {
        self.current().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn current(&self) -> Result<Snapshot, StorageError> {
        self.snapshot
            .read()
            .map(|s| Arc::clone(&s))
            .map_err(|_| StorageError::LockPoisoned { what: "pattern snapshot" })
    }

    fn swap(&self, patterns: Vec<PartPattern>) -> Result<usize, StorageError> {
        let map = index(patterns);
        let written = map.len();
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| StorageError::LockPoisoned { what: "pattern snapshot" })?;
        *guard = Arc::new(map);
        Ok(written)
    }
}

fn index(patterns: Vec<PartPattern>) -> FxHashMap<i64, Arc<PartPattern>> {
    patterns
        .into_iter()
        .map(|p| (p.part_id, Arc::new(p)))
        .collect()
}

impl PatternStore for InMemoryPatternStore {
    fn get(&self, part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError> {
        Ok(self.current()?.get(&part_id).cloned())
    }

    fn put_batch(&self, records: Vec<PartPattern>) -> Result<usize, StorageError> {
        self.swap(records)
    }
}
