//! Per-part aggregation: slot tallies, ranking, zone/aisle distributions.

use chrono::{DateTime, Utc};
use putaway_core::types::collections::FxHashMap;
use putaway_core::types::{LocationUsage, PartHistory, PartPattern, PlacementEvent};

use crate::location::parse;

use super::super::round2;
use super::distribution::Distribution;

/// Running tally for one slot.
struct SlotTally {
    count: u64,
    first_used: DateTime<Utc>,
    last_used: DateTime<Utc>,
}

/// Turns a part's placement events into a ranked `PartPattern`.
///
/// Output is fully deterministic for a given multiset of events; input
/// order does not matter. `metrics` is left unset for the scorer.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternAggregator;

impl PatternAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate a history, carrying its part/client descriptors over.
    pub fn aggregate_history(&self, history: &PartHistory) -> PartPattern {
        let mut pattern = self.aggregate(history.part_id, &history.events);
        pattern.part_code = history.part_code.clone();
        pattern.client_name = history.client_name.clone();
        if history.client_id.is_some() {
            pattern.client_id = history.client_id;
        }
        pattern
    }

    /// Aggregate raw events for one part.
    pub fn aggregate(&self, part_id: i64, events: &[PlacementEvent]) -> PartPattern {
        let mut pattern = PartPattern::empty(part_id);

        let mut tallies: FxHashMap<&str, SlotTally> = FxHashMap::default();
        let mut latest: Option<&PlacementEvent> = None;

        for event in events {
            // scanned codes can carry padding; an all-blank code is not a slot
            let code = event.slot_code.trim();
            if code.is_empty() {
                continue;
            }
            tallies
                .entry(code)
                .and_modify(|t| {
                    t.count += 1;
                    t.first_used = t.first_used.min(event.occurred_at);
                    t.last_used = t.last_used.max(event.occurred_at);
                })
                .or_insert(SlotTally {
                    count: 1,
                    first_used: event.occurred_at,
                    last_used: event.occurred_at,
                });
            if latest.map_or(true, |l| event.occurred_at >= l.occurred_at) {
                latest = Some(event);
            }
        }

        let total: u64 = tallies.values().map(|t| t.count).sum();
        if total == 0 {
            return pattern;
        }

        let mut locations: Vec<LocationUsage> = tallies
            .into_iter()
            .map(|(code, t)| LocationUsage {
                code: code.to_string(),
                count: t.count,
                percentage: round2(t.count as f64 / total as f64 * 100.0),
                first_used: t.first_used,
                last_used: t.last_used,
            })
            .collect();

        locations.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.last_used.cmp(&a.last_used))
                .then_with(|| a.code.cmp(&b.code))
        });

        let mut zones = Distribution::new();
        let mut aisles = Distribution::new();
        for usage in &locations {
            if let Some(loc) = parse(&usage.code) {
                zones.add(&loc.zone, usage.count);
                aisles.add(&loc.aisle, usage.count);
            }
        }

        pattern.total_events = total;
        pattern.distinct_slots = locations.len() as u64;
        pattern.last_event_at = locations.iter().map(|l| l.last_used).max();
        pattern.client_id = latest.and_then(|e| e.client_id);
        pattern.zone_distribution = zones.shares(total);
        pattern.aisle_distribution = aisles.shares(total);
        pattern.primary_zone = zones.primary().map(str::to_string);
        pattern.primary_aisle = aisles.primary().map(str::to_string);
        pattern.locations = locations;
        pattern
    }
}
