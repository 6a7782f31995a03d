//! Property tests for aggregation and scoring.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use putaway_analysis::patterns::confidence::factors::composite;
use putaway_analysis::PatternAggregator;
use putaway_core::types::{PatternStrength, PlacementEvent};

const SLOTS: &[&str] = &[
    "TN52D", "TN53D", "TP03D", "TQ11A", "HA01B", "HA02B", "HB10C", "RA07A", "FLOOR1", "REC05",
];

fn arb_events() -> impl Strategy<Value = Vec<PlacementEvent>> {
    prop::collection::vec((0..SLOTS.len(), 0i64..400), 1..200).prop_map(|picks| {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        picks
            .into_iter()
            .map(|(slot, day)| PlacementEvent {
                part_id: 1,
                slot_code: SLOTS[slot].to_string(),
                client_id: None,
                occurred_at: base + Duration::days(day),
                actor: "op".into(),
            })
            .collect()
    })
}

fn arb_strength() -> impl Strategy<Value = PatternStrength> {
    prop_oneof![
        Just(PatternStrength::Weak),
        Just(PatternStrength::Moderate),
        Just(PatternStrength::Strong),
    ]
}

proptest! {
    #[test]
    fn percentages_sum_to_one_hundred(events in arb_events()) {
        let pattern = PatternAggregator::new().aggregate(1, &events);
        let sum: f64 = pattern.locations.iter().map(|l| l.percentage).sum();
        prop_assert!((sum - 100.0).abs() <= 0.1, "sum was {sum}");
        prop_assert_eq!(pattern.total_events, events.len() as u64);
    }

    #[test]
    fn ranking_is_count_then_recency_then_code(events in arb_events()) {
        let pattern = PatternAggregator::new().aggregate(1, &events);
        for pair in pattern.locations.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ordered = a.count > b.count
                || (a.count == b.count && a.last_used > b.last_used)
                || (a.count == b.count && a.last_used == b.last_used && a.code < b.code);
            prop_assert!(ordered, "{} before {}", a.code, b.code);
        }
    }

    #[test]
    fn confidence_never_rises_with_age(
        strength in arb_strength(),
        ratio in 0.0f64..=1.0,
        total in 1u64..5000,
        d1 in 0i64..2000,
        extra in 0i64..2000,
    ) {
        let newer = composite(strength, ratio, total, d1);
        let older = composite(strength, ratio, total, d1 + extra);
        prop_assert!(older <= newer);
        prop_assert!((0.0..=1.0).contains(&newer));
    }

    #[test]
    fn confidence_never_falls_with_tier(
        ratio in 0.0f64..=1.0,
        total in 1u64..5000,
        days in 0i64..2000,
    ) {
        let weak = composite(PatternStrength::Weak, ratio, total, days);
        let moderate = composite(PatternStrength::Moderate, ratio, total, days);
        let strong = composite(PatternStrength::Strong, ratio, total, days);
        prop_assert!(weak <= moderate);
        prop_assert!(moderate <= strong);
    }
}
