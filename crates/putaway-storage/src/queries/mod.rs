//! Table-level query functions. Each takes a borrowed connection so it can
//! run on a reader, the writer, or inside a transaction.

pub mod audit;
pub mod events;
pub mod locations;
pub mod parts;
pub mod patterns;

use chrono::{DateTime, Utc};

use putaway_core::errors::StorageError;

pub(crate) fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Stored epoch millis back to a timestamp. Values chrono cannot represent
/// are a corrupt row, not a date to guess at.
pub(crate) fn from_millis(ms: i64) -> Result<DateTime<Utc>, StorageError> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| StorageError::Serialization {
        message: format!("timestamp out of range: {ms} ms"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_millis_round_trip() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 4, 9, 30, 0).unwrap();
        assert_eq!(from_millis(to_millis(ts)).unwrap(), ts);
    }

    #[test]
    fn test_out_of_range_millis_rejected() {
        let err = from_millis(i64::MAX).unwrap_err();
        assert!(matches!(err, StorageError::Serialization { .. }));
    }
}
