//! locations table queries: slot registry and live occupancy.

use chrono::Utc;
use putaway_core::errors::StorageError;
use putaway_core::types::SlotStatus;
use rusqlite::{params, Connection, OptionalExtension};

use crate::sql_err;

/// Register a slot as free if it is not known yet. Returns whether a row was added.
pub fn register_location(conn: &Connection, code: &str) -> Result<bool, StorageError> {
    let n = conn
        .execute(
            "INSERT OR IGNORE INTO locations (code, client_id, updated_at) VALUES (?1, NULL, ?2)",
            params![code, Utc::now().timestamp_millis()],
        )
        .map_err(sql_err)?;
    Ok(n > 0)
}

/// Mark a slot as holding stock for `client_id`, registering it if needed.
pub fn assign_location(conn: &Connection, code: &str, client_id: i64) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO locations (code, client_id, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(code) DO UPDATE SET client_id = excluded.client_id, updated_at = excluded.updated_at",
        params![code, client_id, Utc::now().timestamp_millis()],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Free a slot. Returns false if the slot is not registered.
pub fn release_location(conn: &Connection, code: &str) -> Result<bool, StorageError> {
    let n = conn
        .execute(
            "UPDATE locations SET client_id = NULL, updated_at = ?2 WHERE code = ?1",
            params![code, Utc::now().timestamp_millis()],
        )
        .map_err(sql_err)?;
    Ok(n > 0)
}

/// No row → `Unknown`; NULL owner → `Free`; otherwise `Occupied`.
pub fn location_status(conn: &Connection, code: &str) -> Result<SlotStatus, StorageError> {
    let owner: Option<Option<i64>> = conn
        .prepare_cached("SELECT client_id FROM locations WHERE code = ?1")
        .and_then(|mut stmt| stmt.query_row(params![code], |row| row.get(0)).optional())
        .map_err(sql_err)?;

    Ok(match owner {
        None => SlotStatus::Unknown,
        Some(None) => SlotStatus::Free,
        Some(Some(_)) => SlotStatus::Occupied,
    })
}
