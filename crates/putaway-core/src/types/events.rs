//! Historical putaway events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical putaway: a part placed into a slot.
///
/// Rows come from the transactional store and are never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementEvent {
    pub part_id: i64,
    /// Destination slot code. May be empty on dirty upstream rows.
    pub slot_code: String,
    pub client_id: Option<i64>,
    pub occurred_at: DateTime<Utc>,
    /// Operator who performed the putaway.
    pub actor: String,
}

/// All events for one part, with the descriptors used in explanations.
#[derive(Debug, Clone, Default)]
pub struct PartHistory {
    pub part_id: i64,
    pub part_code: Option<String>,
    pub client_id: Option<i64>,
    pub client_name: Option<String>,
    /// Time-ordered, oldest first.
    pub events: Vec<PlacementEvent>,
}

impl PartHistory {
    pub fn new(part_id: i64) -> Self {
        Self {
            part_id,
            ..Default::default()
        }
    }
}
