//! audit_log table queries.

use chrono::{DateTime, Utc};
use putaway_core::errors::StorageError;
use putaway_core::types::AuditEvent;
use rusqlite::{params, Connection};

use super::{from_millis, to_millis};
use crate::sql_err;

/// An audit event as read back from the log.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub id: i64,
    pub event: AuditEvent,
    pub recorded_at: DateTime<Utc>,
}

pub fn insert_audit_events(conn: &Connection, events: &[AuditEvent]) -> Result<usize, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO audit_log (event_type, part_id, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sql_err)?;

    let recorded_at = to_millis(Utc::now());
    let mut count = 0;
    for event in events {
        let payload = serde_json::to_string(event)?;
        stmt.execute(params![event.kind(), event.part_id(), payload, recorded_at])
            .map_err(sql_err)?;
        count += 1;
    }
    Ok(count)
}

/// Most recent first.
pub fn recent_audit_events(conn: &Connection, limit: usize) -> Result<Vec<AuditRecord>, StorageError> {
    query_records(
        conn,
        "SELECT id, payload, recorded_at FROM audit_log ORDER BY id DESC LIMIT ?1",
        params![limit as i64],
    )
}

/// Oldest first.
pub fn audit_events_for_part(conn: &Connection, part_id: i64) -> Result<Vec<AuditRecord>, StorageError> {
    query_records(
        conn,
        "SELECT id, payload, recorded_at FROM audit_log WHERE part_id = ?1 ORDER BY id",
        params![part_id],
    )
}

fn query_records(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<AuditRecord>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(sql_err)?;
    let rows = stmt
        .query_map(args, |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?))
        })
        .map_err(sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_err)?;

    rows.into_iter()
        .map(|(id, payload, recorded_at)| {
            Ok(AuditRecord {
                id,
                event: serde_json::from_str(&payload)?,
                recorded_at: from_millis(recorded_at)?,
            })
        })
        .collect()
}
