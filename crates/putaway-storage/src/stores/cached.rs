//! Read-through pattern cache: Moka (TinyLFU admission) in front of any store.

use std::sync::{Arc, RwLock};

use moka::sync::Cache;
use putaway_core::config::StorageConfig;
use putaway_core::errors::StorageError;
use putaway_core::traits::PatternStore;
use putaway_core::types::PartPattern;

/// Caches hits and misses by part id. `put_batch` drops every entry.
///
/// A lookup that started before a replace finished does not populate the
/// cache. Inserts hold the generation lock shared and a replace bumps it
/// exclusively before invalidating, so an insert lands either before the
/// invalidation or not at all.
pub struct CachedPatternStore<S> {
    inner: S,
    cache: Cache<i64, Option<Arc<PartPattern>>>,
    generation: RwLock<u64>,
}

impl<S: PatternStore> CachedPatternStore<S> {
    pub fn new(inner: S, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
            generation: RwLock::new(0),
        }
    }

    pub fn from_config(inner: S, config: &StorageConfig) -> Self {
        Self::new(inner, config.pattern_cache_capacity)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    fn current_generation(&self) -> Result<u64, StorageError> {
        self.generation
            .read()
            .map(|g| *g)
            .map_err(|_| StorageError::LockPoisoned { what: "pattern cache generation" })
    }
}

impl<S: PatternStore> PatternStore for CachedPatternStore<S> {
    fn get(&self, part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError> {
        if let Some(hit) = self.cache.get(&part_id) {
            return Ok(hit);
        }
        let generation = self.current_generation()?;
        let loaded = self.inner.get(part_id)?;
        let current = self
            .generation
            .read()
            .map_err(|_| StorageError::LockPoisoned { what: "pattern cache generation" })?;
        if *current == generation {
            self.cache.insert(part_id, loaded.clone());
        }
        Ok(loaded)
    }

    fn put_batch(&self, records: Vec<PartPattern>) -> Result<usize, StorageError> {
        let written = self.inner.put_batch(records);
        let mut generation = self
            .generation
            .write()
            .map_err(|_| StorageError::LockPoisoned { what: "pattern cache generation" })?;
        *generation += 1;
        self.cache.invalidate_all();
        written
    }
}
