//! ConfidenceScorer: turns an aggregated pattern into `PatternMetrics`.

use chrono::{DateTime, Utc};
use putaway_core::types::{PartPattern, PatternMetrics, RecencyStatus};

use super::factors;

/// Scores aggregated patterns against a reference "now".
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    /// Compute metrics for one pattern. A pattern without events gets the
    /// zero sentinel instead of dividing by zero.
    pub fn score(&self, pattern: &PartPattern, now: DateTime<Utc>) -> PatternMetrics {
        if pattern.total_events == 0 {
            return PatternMetrics::empty();
        }

        let top_pct = pattern.top_location().map_or(0.0, |l| l.percentage);
        let strength = factors::classify_strength(top_pct);
        let ratio = factors::consistency_ratio(pattern.distinct_slots, pattern.total_events);

        let days_since_last = pattern.last_event_at.map(|last| days_between(last, now));
        // no timestamp at all scores as the stalest possible history
        let days = days_since_last.unwrap_or(i64::MAX);

        let recency = match days_since_last {
            Some(d) => factors::recency_status(d),
            None => RecencyStatus::Dormant,
        };

        PatternMetrics {
            strength,
            consistency_ratio: ratio,
            confidence: factors::composite(strength, ratio, pattern.total_events, days),
            recency,
            days_since_last,
        }
    }

    /// Score in place.
    pub fn apply(&self, pattern: &mut PartPattern, now: DateTime<Utc>) {
        pattern.metrics = Some(self.score(pattern, now));
    }
}

/// Whole days from `last` to `now`, floored; future timestamps count as 0.
fn days_between(last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - last).num_days().max(0)
}
