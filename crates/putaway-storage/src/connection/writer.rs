//! Write transaction helper.

use putaway_core::errors::StorageError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Run `f` inside a BEGIN IMMEDIATE transaction, committing on success.
/// Taking the write lock up front avoids SQLITE_BUSY upgrades mid-transaction.
pub fn with_immediate_transaction<F, T>(conn: &mut Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| StorageError::SqliteError {
            message: format!("failed to begin immediate: {e}"),
        })?;

    // dropped without commit on error, which rolls back
    let result = f(&tx)?;

    tx.commit().map_err(|e| StorageError::SqliteError {
        message: format!("failed to commit: {e}"),
    })?;

    Ok(result)
}
