//! Individual scoring factors.
//!
//! confidence = round(min(1.0, (base + consistency_bonus + volume_bonus) * recency_factor), 2)
//!
//! This is a fixed heuristic, not a calibrated model. The order of operations
//! (sum, scale by recency, clamp, round) is part of the contract.

use putaway_core::constants::{
    ACTIVE_WINDOW_DAYS, MODERATE_THRESHOLD_PCT, STRONG_THRESHOLD_PCT,
};
use putaway_core::types::{PatternStrength, RecencyStatus};

use super::super::round2;

/// Base score per strength tier.
pub const BASE_STRONG: f64 = 0.7;
pub const BASE_MODERATE: f64 = 0.5;
pub const BASE_WEAK: f64 = 0.3;

/// Weight of `(1 - consistency_ratio)`.
pub const CONSISTENCY_WEIGHT: f64 = 0.2;

/// Volume bonus cap and the event count that reaches it.
pub const VOLUME_BONUS_CAP: f64 = 0.1;
pub const VOLUME_SCALE: f64 = 1000.0;

/// Tier from the top slot's share. Boundaries fall to the lower tier.
pub fn classify_strength(top_pct: f64) -> PatternStrength {
    if top_pct > STRONG_THRESHOLD_PCT {
        PatternStrength::Strong
    } else if top_pct > MODERATE_THRESHOLD_PCT {
        PatternStrength::Moderate
    } else {
        PatternStrength::Weak
    }
}

pub fn base_score(strength: PatternStrength) -> f64 {
    match strength {
        PatternStrength::Strong => BASE_STRONG,
        PatternStrength::Moderate => BASE_MODERATE,
        PatternStrength::Weak => BASE_WEAK,
    }
}

/// Distinct slots per event, rounded to 2 decimals. Zero events → 0.0.
pub fn consistency_ratio(distinct_slots: u64, total_events: u64) -> f64 {
    if total_events == 0 {
        return 0.0;
    }
    round2(distinct_slots as f64 / total_events as f64)
}

pub fn consistency_bonus(ratio: f64) -> f64 {
    ((1.0 - ratio) * CONSISTENCY_WEIGHT).max(0.0)
}

pub fn recency_status(days_since_last: i64) -> RecencyStatus {
    if days_since_last < ACTIVE_WINDOW_DAYS {
        RecencyStatus::Active
    } else {
        RecencyStatus::Dormant
    }
}

pub fn recency_factor(days_since_last: i64) -> f64 {
    match days_since_last {
        d if d < 30 => 1.0,
        d if d < 90 => 0.9,
        d if d < 180 => 0.7,
        _ => 0.5,
    }
}

pub fn volume_bonus(total_events: u64) -> f64 {
    (total_events as f64 / VOLUME_SCALE).min(VOLUME_BONUS_CAP)
}

/// Combine the factors in contract order.
pub fn composite(
    strength: PatternStrength,
    ratio: f64,
    total_events: u64,
    days_since_last: i64,
) -> f64 {
    let raw = (base_score(strength) + consistency_bonus(ratio) + volume_bonus(total_events))
        * recency_factor(days_since_last);
    round2(raw.min(1.0))
}
