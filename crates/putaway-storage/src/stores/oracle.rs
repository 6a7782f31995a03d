use std::sync::Arc;

use putaway_core::errors::{OracleError, StorageError};
use putaway_core::traits::AvailabilityOracle;
use putaway_core::types::SlotStatus;
use tracing::info;

use crate::connection::DatabaseManager;
use crate::queries::locations;

/// Live occupancy from the `locations` table.
#[derive(Debug, Clone)]
pub struct SqliteAvailabilityOracle {
    db: Arc<DatabaseManager>,
}

impl SqliteAvailabilityOracle {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Record that stock for `client_id` was put away in `slot`.
    pub fn confirm_putaway(&self, slot: &str, client_id: i64) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| locations::assign_location(conn, slot, client_id))?;
        info!(slot, client_id, "putaway confirmed");
        Ok(())
    }

    /// Free a slot. Returns false if it is not registered.
    pub fn release(&self, slot: &str) -> Result<bool, StorageError> {
        self.db.with_writer(|conn| locations::release_location(conn, slot))
    }

    /// Add slots to the registry as free; existing slots are left alone.
    pub fn register<I, S>(&self, slots: I) -> Result<usize, StorageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.db.with_writer(|conn| {
            let mut added = 0;
            for slot in slots {
                if locations::register_location(conn, slot.as_ref())? {
                    added += 1;
                }
            }
            Ok(added)
        })
    }
}

impl AvailabilityOracle for SqliteAvailabilityOracle {
    fn check(&self, slot_code: &str) -> Result<SlotStatus, OracleError> {
        self.db
            .with_reader(|conn| locations::location_status(conn, slot_code))
            .map_err(|e| OracleError::LookupFailed {
                slot: slot_code.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lifecycle() {
        let oracle = SqliteAvailabilityOracle::new(Arc::new(DatabaseManager::open_in_memory().unwrap()));
        assert_eq!(oracle.check("TN52D").unwrap(), SlotStatus::Unknown);

        assert_eq!(oracle.register(["TN52D", "TN53D"]).unwrap(), 2);
        assert_eq!(oracle.register(["TN52D"]).unwrap(), 0);
        assert_eq!(oracle.check("TN52D").unwrap(), SlotStatus::Free);

        oracle.confirm_putaway("TN52D", 7).unwrap();
        assert_eq!(oracle.check("TN52D").unwrap(), SlotStatus::Occupied);

        assert!(oracle.release("TN52D").unwrap());
        assert_eq!(oracle.check("TN52D").unwrap(), SlotStatus::Free);
        assert!(!oracle.release("ZZ00Z").unwrap());
    }
}
