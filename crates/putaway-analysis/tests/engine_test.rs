//! Engine behaviour against stub collaborators.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone, Utc};

use putaway_analysis::recommend::explanation::TemplateExplainer;
use putaway_analysis::{PatternAggregator, RecommendationEngine, Resilient, RetryPolicy};
use putaway_core::errors::{OracleError, RecommendError, StorageError};
use putaway_core::traits::{AuditSink, AvailabilityOracle, CancellationToken, PatternStore};
use putaway_core::types::{
    AuditEvent, PartPattern, PlacementEvent, RecommendationOutcome, SlotStatus,
};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap()
}

/// 5x TN52D, 3x TP03D, 2x TQ11A, 1x FLOOR1.
fn sample_pattern(part_id: i64) -> PartPattern {
    let mut events = Vec::new();
    let mut day = 1;
    for (code, n) in [("TN52D", 5), ("TP03D", 3), ("TQ11A", 2), ("FLOOR1", 1)] {
        for _ in 0..n {
            events.push(PlacementEvent {
                part_id,
                slot_code: code.to_string(),
                client_id: Some(9),
                occurred_at: at(day),
                actor: "op".into(),
            });
            day += 1;
        }
    }
    let mut pattern = PatternAggregator::new().aggregate(part_id, &events);
    pattern.part_code = Some("BRK-100".into());
    pattern.client_name = Some("Acme".into());
    pattern
}

#[derive(Default)]
struct MapStore(Mutex<Vec<PartPattern>>);

impl PatternStore for MapStore {
    fn get(&self, part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.part_id == part_id)
            .cloned()
            .map(Arc::new))
    }

    fn put_batch(&self, records: Vec<PartPattern>) -> Result<usize, StorageError> {
        let n = records.len();
        *self.0.lock().unwrap() = records;
        Ok(n)
    }
}

struct DownStore {
    calls: AtomicU32,
}

impl PatternStore for DownStore {
    fn get(&self, _part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Unavailable {
            message: "connection refused".into(),
        })
    }

    fn put_batch(&self, _records: Vec<PartPattern>) -> Result<usize, StorageError> {
        unreachable!()
    }
}

/// Fixed status per slot; `None` in the table means the lookup errors.
struct TableOracle(Vec<(&'static str, Option<SlotStatus>)>);

impl AvailabilityOracle for TableOracle {
    fn check(&self, slot_code: &str) -> Result<SlotStatus, OracleError> {
        match self.0.iter().find(|(code, _)| *code == slot_code) {
            Some((_, Some(status))) => Ok(*status),
            Some((_, None)) => Err(OracleError::Timeout {
                slot: slot_code.into(),
                timeout: Duration::from_secs(30),
            }),
            None => Ok(SlotStatus::Free),
        }
    }
}

/// Cancels the shared token on its first lookup.
struct CancellingOracle(CancellationToken);

impl AvailabilityOracle for CancellingOracle {
    fn check(&self, _slot_code: &str) -> Result<SlotStatus, OracleError> {
        self.0.cancel();
        Ok(SlotStatus::Free)
    }
}

#[derive(Default)]
struct Recorder(Mutex<Vec<AuditEvent>>);

impl AuditSink for Recorder {
    fn record(&self, event: AuditEvent) -> Result<(), StorageError> {
        self.0.lock().unwrap().push(event);
        Ok(())
    }
}

fn engine_with(store: Arc<dyn PatternStore>, oracle: Arc<dyn AvailabilityOracle>) -> RecommendationEngine {
    RecommendationEngine::new(store, oracle, Arc::new(TemplateExplainer))
}

fn loaded_store() -> Arc<MapStore> {
    let store = Arc::new(MapStore::default());
    store.put_batch(vec![sample_pattern(1)]).unwrap();
    store
}

#[test]
fn recommends_top_free_slot_in_rank_order() {
    let engine = engine_with(loaded_store(), Arc::new(TableOracle(vec![])));
    let result = engine.recommend(1).unwrap();

    assert_eq!(result.outcome, RecommendationOutcome::Recommended);
    let rec = result.recommended.as_ref().unwrap();
    assert_eq!(rec.code, "TN52D");
    assert_eq!(rec.usage_count, 5);
    assert_eq!(rec.usage_percentage, 45.45);
    let alts: Vec<&str> = result.alternatives.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(alts, vec!["TP03D", "TQ11A"]);
    assert_eq!(result.total_events, 11);
    assert!(result.explanation.contains("TN52D"));
}

#[test]
fn unknown_part_is_no_history_not_error() {
    let engine = engine_with(loaded_store(), Arc::new(TableOracle(vec![])));
    let result = engine.recommend(999).unwrap();
    assert_eq!(result.outcome, RecommendationOutcome::NoHistory);
    assert!(result.recommended.is_none());
    assert!(result.alternatives.is_empty());
}

#[test]
fn every_slot_taken_is_all_occupied() {
    let oracle = TableOracle(vec![
        ("TN52D", Some(SlotStatus::Occupied)),
        ("TP03D", Some(SlotStatus::Occupied)),
        ("TQ11A", Some(SlotStatus::Unknown)),
    ]);
    let result = engine_with(loaded_store(), Arc::new(oracle)).recommend(1).unwrap();
    assert_eq!(result.outcome, RecommendationOutcome::AllOccupied);
    assert!(result.recommended.is_none());
    let hint = result.hint.unwrap();
    assert_eq!(hint.zone.as_deref(), Some("T"));
    assert_eq!(hint.aisle.as_deref(), Some("N"));
}

#[test]
fn failed_lookup_only_drops_that_slot() {
    let oracle = TableOracle(vec![("TN52D", None)]);
    let result = engine_with(loaded_store(), Arc::new(oracle)).recommend(1).unwrap();
    assert_eq!(result.recommended.unwrap().code, "TP03D");
}

#[test]
fn degraded_oracle_reads_as_all_occupied() {
    let oracle = TableOracle(vec![("TN52D", None), ("TP03D", None), ("TQ11A", None)]);
    let result = engine_with(loaded_store(), Arc::new(oracle)).recommend(1).unwrap();
    assert_eq!(result.outcome, RecommendationOutcome::AllOccupied);
}

#[test]
fn store_failure_is_an_error_and_audited() {
    let recorder = Arc::new(Recorder::default());
    let store = Arc::new(DownStore {
        calls: AtomicU32::new(0),
    });
    let engine = engine_with(store.clone(), Arc::new(TableOracle(vec![])))
        .with_audit_sink(recorder.clone());

    let err = engine.recommend(1).unwrap_err();
    assert!(matches!(err, RecommendError::StoreUnavailable { part_id: 1, .. }));
    assert_eq!(err.kind(), "store_unavailable");

    let events = recorder.0.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), "error");
    assert_eq!(events[0].part_id(), Some(1));
}

#[test]
fn resilient_store_retries_before_failing() {
    let store = Arc::new(DownStore {
        calls: AtomicU32::new(0),
    });
    let wrapped = Resilient::new(store.clone(), RetryPolicy::new(3, Duration::ZERO, 2.0));
    let engine = engine_with(Arc::new(wrapped), Arc::new(TableOracle(vec![])));

    assert!(engine.recommend(1).is_err());
    assert_eq!(store.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn cancellation_mid_flight_returns_cancelled() {
    let token = CancellationToken::new();
    let engine = engine_with(loaded_store(), Arc::new(CancellingOracle(token.clone())));
    let err = engine.recommend_with_cancellation(1, &token).unwrap_err();
    assert!(matches!(err, RecommendError::Cancelled { part_id: 1 }));
}

#[test]
fn cancellation_interrupts_retry_backoff() {
    let failing = TableOracle(vec![
        ("TN52D", None),
        ("TP03D", None),
        ("TQ11A", None),
    ]);
    let oracle = Resilient::new(failing, RetryPolicy::new(3, Duration::from_millis(400), 1.0));
    let engine = engine_with(loaded_store(), Arc::new(oracle));
    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            token.cancel();
        })
    };

    let started = Instant::now();
    let err = engine.recommend_with_cancellation(1, &token).unwrap_err();
    let elapsed = started.elapsed();
    canceller.join().unwrap();

    assert!(matches!(err, RecommendError::Cancelled { part_id: 1 }));
    assert!(elapsed < Duration::from_millis(300), "took {elapsed:?}");
}

#[test]
fn repeated_calls_are_identical() {
    let engine = engine_with(
        loaded_store(),
        Arc::new(TableOracle(vec![("TP03D", Some(SlotStatus::Occupied))])),
    );
    let first = engine.recommend(1).unwrap();
    let second = engine.recommend(1).unwrap();
    assert_eq!(first, second);
}

#[test]
fn engine_shared_across_threads() {
    let engine = Arc::new(engine_with(loaded_store(), Arc::new(TableOracle(vec![]))));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.recommend(1).unwrap().recommended.unwrap().code)
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "TN52D");
    }
}
