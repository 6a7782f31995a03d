//! part_patterns table queries. The full pattern is stored as JSON with
//! confidence and strength denormalized for ad-hoc inspection.

use chrono::{DateTime, Utc};
use putaway_core::errors::StorageError;
use putaway_core::types::PartPattern;
use rusqlite::{params, Connection, OptionalExtension};

use super::to_millis;
use crate::sql_err;

/// Delete every stored pattern and insert `patterns`. Callers run this in
/// one transaction so readers never see a partial set.
pub fn replace_patterns(
    conn: &Connection,
    patterns: &[PartPattern],
    rebuilt_at: DateTime<Utc>,
) -> Result<usize, StorageError> {
    conn.execute("DELETE FROM part_patterns", []).map_err(sql_err)?;

    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO part_patterns (part_id, payload, confidence, strength, rebuilt_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(sql_err)?;

    let rebuilt_at = to_millis(rebuilt_at);
    let mut count = 0;
    for p in patterns {
        let payload = serde_json::to_string(p)?;
        let strength = p.metrics.as_ref().map(|m| m.strength.name());
        stmt.execute(params![p.part_id, payload, p.confidence(), strength, rebuilt_at])
            .map_err(sql_err)?;
        count += 1;
    }
    Ok(count)
}

pub fn get_pattern(conn: &Connection, part_id: i64) -> Result<Option<PartPattern>, StorageError> {
    let payload: Option<String> = conn
        .prepare_cached("SELECT payload FROM part_patterns WHERE part_id = ?1")
        .and_then(|mut stmt| stmt.query_row(params![part_id], |row| row.get(0)).optional())
        .map_err(sql_err)?;

    payload
        .map(|json| serde_json::from_str(&json).map_err(StorageError::from))
        .transpose()
}

pub fn load_all_patterns(conn: &Connection) -> Result<Vec<PartPattern>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT payload FROM part_patterns ORDER BY part_id")
        .map_err(sql_err)?;
    let payloads = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_err)?;

    payloads
        .iter()
        .map(|json| serde_json::from_str(json).map_err(StorageError::from))
        .collect()
}

pub fn count_patterns(conn: &Connection) -> Result<usize, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM part_patterns", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(sql_err)
}
