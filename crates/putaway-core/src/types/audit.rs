//! Audit trail events for recommendations and operator overrides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One audit record, serialized as JSON into the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    Recommendation {
        timestamp: DateTime<Utc>,
        user: String,
        part_id: i64,
        part_code: Option<String>,
        recommended_location: String,
        status: String,
        usage_count: u64,
        usage_percentage: f64,
        alternatives_count: usize,
    },
    Override {
        timestamp: DateTime<Utc>,
        user: String,
        part_id: i64,
        part_code: Option<String>,
        recommended_location: String,
        actual_location: String,
        reason: String,
    },
    Error {
        timestamp: DateTime<Utc>,
        error_type: String,
        error_message: String,
        part_id: Option<i64>,
    },
}

impl AuditEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Recommendation { .. } => "recommendation",
            Self::Override { .. } => "override",
            Self::Error { .. } => "error",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Recommendation { timestamp, .. }
            | Self::Override { timestamp, .. }
            | Self::Error { timestamp, .. } => *timestamp,
        }
    }

    pub fn part_id(&self) -> Option<i64> {
        match self {
            Self::Recommendation { part_id, .. } | Self::Override { part_id, .. } => Some(*part_id),
            Self::Error { part_id, .. } => *part_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_tag() {
        let event = AuditEvent::Error {
            timestamp: Utc::now(),
            error_type: "store_unavailable".into(),
            error_message: "disk I/O error".into(),
            part_id: Some(600),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "error");
        assert_eq!(event.kind(), "error");
        assert_eq!(event.part_id(), Some(600));
    }
}
