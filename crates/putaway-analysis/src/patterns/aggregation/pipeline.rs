//! Offline rebuild: every part's history → aggregated, scored patterns →
//! one atomic `put_batch`.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use putaway_core::errors::StorageError;
use putaway_core::traits::{EventSource, PatternStore};
use putaway_core::types::{PartHistory, PartPattern};

use crate::patterns::confidence::ConfidenceScorer;

use super::aggregator::PatternAggregator;

/// Summary of one rebuild.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RebuildStats {
    pub parts: usize,
    pub events: u64,
    /// Parts whose history held no usable slot codes.
    pub empty_parts: usize,
    /// Pattern count per strength tier name.
    pub by_strength: BTreeMap<String, usize>,
    pub written: usize,
    pub elapsed_ms: u128,
}

/// Patterns built by `RebuildPipeline::build`, sorted by part id.
#[derive(Debug)]
pub struct RebuildOutput {
    pub patterns: Vec<PartPattern>,
    pub stats: RebuildStats,
}

/// Aggregate + score all parts in parallel.
#[derive(Debug, Default, Clone)]
pub struct RebuildPipeline {
    aggregator: PatternAggregator,
    scorer: ConfidenceScorer,
}

impl RebuildPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build scored patterns without touching any store.
    pub fn build(&self, histories: &[PartHistory], now: DateTime<Utc>) -> RebuildOutput {
        let mut patterns: Vec<PartPattern> = histories
            .par_iter()
            .map(|history| {
                let mut pattern = self.aggregator.aggregate_history(history);
                self.scorer.apply(&mut pattern, now);
                pattern
            })
            .collect();
        patterns.sort_by_key(|p| p.part_id);

        let mut stats = RebuildStats {
            parts: patterns.len(),
            ..Default::default()
        };
        for pattern in &patterns {
            stats.events += pattern.total_events;
            if !pattern.has_history() {
                stats.empty_parts += 1;
            }
            if let Some(metrics) = &pattern.metrics {
                *stats
                    .by_strength
                    .entry(metrics.strength.name().to_string())
                    .or_default() += 1;
            }
        }

        RebuildOutput { patterns, stats }
    }

    /// Full cycle: read every history, build, replace the store's contents.
    pub fn run(
        &self,
        source: &dyn EventSource,
        store: &dyn PatternStore,
        now: DateTime<Utc>,
    ) -> Result<RebuildStats, StorageError> {
        let started = Instant::now();
        let histories = source.part_histories()?;
        let RebuildOutput { patterns, mut stats } = self.build(&histories, now);

        stats.written = store.put_batch(patterns)?;
        stats.elapsed_ms = started.elapsed().as_millis();

        info!(
            parts = stats.parts,
            events = stats.events,
            empty_parts = stats.empty_parts,
            written = stats.written,
            elapsed_ms = stats.elapsed_ms as u64,
            "pattern rebuild complete"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, TimeZone};
    use putaway_core::types::PlacementEvent;

    fn history(part_id: i64, codes: &[&str]) -> PartHistory {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        PartHistory {
            part_id,
            events: codes
                .iter()
                .enumerate()
                .map(|(i, c)| PlacementEvent {
                    part_id,
                    slot_code: c.to_string(),
                    client_id: Some(1),
                    occurred_at: base + Duration::days(i as i64),
                    actor: "op".into(),
                })
                .collect(),
            ..PartHistory::new(part_id)
        }
    }

    struct FixedSource(Vec<PartHistory>);

    impl EventSource for FixedSource {
        fn part_histories(&self) -> Result<Vec<PartHistory>, StorageError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingStore(Mutex<Vec<PartPattern>>);

    impl PatternStore for RecordingStore {
        fn get(&self, part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError> {
            let guard = self.0.lock().unwrap();
            Ok(guard.iter().find(|p| p.part_id == part_id).cloned().map(Arc::new))
        }

        fn put_batch(&self, records: Vec<PartPattern>) -> Result<usize, StorageError> {
            let n = records.len();
            *self.0.lock().unwrap() = records;
            Ok(n)
        }
    }

    #[test]
    fn test_build_scores_every_part() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let histories = vec![
            history(3, &["TN52D", "TN52D", "TN52D", "TP03D"]),
            history(1, &["A01A"]),
            history(2, &[""]),
        ];
        let out = RebuildPipeline::new().build(&histories, now);

        let ids: Vec<i64> = out.patterns.iter().map(|p| p.part_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(out.patterns.iter().all(|p| p.metrics.is_some()));
        assert_eq!(out.stats.parts, 3);
        assert_eq!(out.stats.events, 5);
        assert_eq!(out.stats.empty_parts, 1);
        assert_eq!(out.stats.by_strength["STRONG"], 2);
        assert_eq!(out.stats.by_strength["WEAK"], 1);
    }

    #[test]
    fn test_run_replaces_store() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let store = RecordingStore::default();
        store
            .put_batch(vec![PartPattern::empty(99)])
            .unwrap();

        let source = FixedSource(vec![history(1, &["A01A", "A01A"])]);
        let stats = RebuildPipeline::new().run(&source, &store, now).unwrap();

        assert_eq!(stats.written, 1);
        assert!(store.get(99).unwrap().is_none());
        let pattern = store.get(1).unwrap().unwrap();
        assert_eq!(pattern.total_events, 2);
    }
}
