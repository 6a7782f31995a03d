//! parts and clients table queries.

use putaway_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use crate::sql_err;

#[derive(Debug, Clone, PartialEq)]
pub struct PartRecord {
    pub part_id: i64,
    pub part_code: String,
    pub client_id: Option<i64>,
    pub description: Option<String>,
}

pub fn upsert_client(conn: &Connection, client_id: i64, name: &str) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO clients (client_id, name) VALUES (?1, ?2)
         ON CONFLICT(client_id) DO UPDATE SET name = excluded.name",
    )
    .and_then(|mut stmt| stmt.execute(params![client_id, name]))
    .map_err(sql_err)?;
    Ok(())
}

pub fn upsert_part(conn: &Connection, part: &PartRecord) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO parts (part_id, part_code, client_id, description) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(part_id) DO UPDATE SET
           part_code = excluded.part_code,
           client_id = excluded.client_id,
           description = excluded.description",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![part.part_id, part.part_code, part.client_id, part.description])
    })
    .map_err(sql_err)?;
    Ok(())
}

pub fn get_part(conn: &Connection, part_id: i64) -> Result<Option<PartRecord>, StorageError> {
    conn.query_row(
        "SELECT part_id, part_code, client_id, description FROM parts WHERE part_id = ?1",
        params![part_id],
        |row| {
            Ok(PartRecord {
                part_id: row.get(0)?,
                part_code: row.get(1)?,
                client_id: row.get(2)?,
                description: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(sql_err)
}

/// Part ids with at least one recorded event, ascending.
pub fn part_ids_with_events(conn: &Connection) -> Result<Vec<i64>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT DISTINCT part_id FROM putaway_events ORDER BY part_id")
        .map_err(sql_err)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(sql_err)?
        .collect::<Result<Vec<i64>, _>>()
        .map_err(sql_err)?;
    Ok(ids)
}
