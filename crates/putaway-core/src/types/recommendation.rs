//! Per-request recommendation output.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pattern::PatternMetrics;

/// Live state of a slot as reported by the availability oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Free,
    Occupied,
    /// No such slot is currently registered, or the lookup failed.
    Unknown,
}

impl SlotStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Occupied => "OCCUPIED",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Free)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which branch of the decision policy produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Recommended,
    NoHistory,
    AllOccupied,
}

impl RecommendationOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::NoHistory => "no_history",
            Self::AllOccupied => "all_occupied",
        }
    }
}

impl fmt::Display for RecommendationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A slot offered to the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub code: String,
    pub status: SlotStatus,
    pub usage_count: u64,
    pub usage_percentage: f64,
}

/// Zone/aisle guidance when no specific slot can be offered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationHint {
    pub zone: Option<String>,
    pub zone_percentage: Option<f64>,
    pub aisle: Option<String>,
    pub aisle_percentage: Option<f64>,
}

impl LocationHint {
    pub fn is_empty(&self) -> bool {
        self.zone.is_none() && self.aisle.is_none()
    }
}

/// Result of one `recommend` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub part_id: i64,
    pub outcome: RecommendationOutcome,
    pub recommended: Option<SlotCandidate>,
    /// Up to the configured number of alternatives, in rank order.
    pub alternatives: Vec<SlotCandidate>,
    pub hint: Option<LocationHint>,
    pub explanation: String,
    pub total_events: u64,
    pub metrics: Option<PatternMetrics>,
}

/// Input handed to the explanation generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationContext {
    pub part_code: String,
    pub client_name: String,
    pub recommended_slot: String,
    pub usage_count: u64,
    pub usage_percentage: f64,
}
