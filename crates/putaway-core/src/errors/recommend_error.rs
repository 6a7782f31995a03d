use thiserror::Error;

use super::storage_error::StorageError;

/// Conditions under which the engine cannot produce a trustworthy answer.
///
/// `NoHistory` and `AllOccupied` are outcomes, not errors, and live on
/// `RecommendationResult`.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("pattern store unavailable for part {part_id}: {source}")]
    StoreUnavailable {
        part_id: i64,
        #[source]
        source: StorageError,
    },

    #[error("recommendation for part {part_id} was cancelled")]
    Cancelled { part_id: i64 },
}

impl RecommendError {
    /// Stable tag used in audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
