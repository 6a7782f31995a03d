//! Aggregated placement patterns.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Usage of one slot by one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUsage {
    pub code: String,
    pub count: u64,
    /// Share of the part's putaways, in percent, rounded to 2 decimals.
    pub percentage: f64,
    pub first_used: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

/// How dominant the top slot is in a part's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternStrength {
    Weak,
    Moderate,
    Strong,
}

impl PatternStrength {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Weak => "WEAK",
            Self::Moderate => "MODERATE",
            Self::Strong => "STRONG",
        }
    }
}

impl fmt::Display for PatternStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the part is still being put away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecencyStatus {
    Active,
    Dormant,
}

impl RecencyStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Dormant => "DORMANT",
        }
    }
}

impl fmt::Display for RecencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scores derived from an aggregated pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMetrics {
    pub strength: PatternStrength,
    /// Distinct slots per event; lower is more predictable.
    pub consistency_ratio: f64,
    /// Composite heuristic in [0.0, 1.0].
    pub confidence: f64,
    pub recency: RecencyStatus,
    pub days_since_last: Option<i64>,
}

impl PatternMetrics {
    /// Metrics for a part with no usable history.
    pub fn empty() -> Self {
        Self {
            strength: PatternStrength::Weak,
            consistency_ratio: 0.0,
            confidence: 0.0,
            recency: RecencyStatus::Dormant,
            days_since_last: None,
        }
    }
}

/// Everything learned about where one part gets put away.
///
/// Built by a full rebuild and replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPattern {
    pub part_id: i64,
    pub part_code: Option<String>,
    pub client_id: Option<i64>,
    pub client_name: Option<String>,
    pub total_events: u64,
    pub distinct_slots: u64,
    /// Ranked: count desc, last_used desc, code asc.
    pub locations: Vec<LocationUsage>,
    pub zone_distribution: BTreeMap<String, f64>,
    pub aisle_distribution: BTreeMap<String, f64>,
    pub primary_zone: Option<String>,
    pub primary_aisle: Option<String>,
    pub last_event_at: Option<DateTime<Utc>>,
    /// Unset until the scorer runs.
    #[serde(default)]
    pub metrics: Option<PatternMetrics>,
}

impl PartPattern {
    /// A pattern with no usable history.
    pub fn empty(part_id: i64) -> Self {
        Self {
            part_id,
            part_code: None,
            client_id: None,
            client_name: None,
            total_events: 0,
            distinct_slots: 0,
            locations: Vec::new(),
            zone_distribution: BTreeMap::new(),
            aisle_distribution: BTreeMap::new(),
            primary_zone: None,
            primary_aisle: None,
            last_event_at: None,
            metrics: None,
        }
    }

    pub fn has_history(&self) -> bool {
        !self.locations.is_empty()
    }

    /// The highest-ranked slot, if any.
    pub fn top_location(&self) -> Option<&LocationUsage> {
        self.locations.first()
    }

    pub fn confidence(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.confidence)
    }
}
