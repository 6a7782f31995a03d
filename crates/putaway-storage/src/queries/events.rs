//! putaway_events table queries.

use putaway_core::errors::StorageError;
use putaway_core::types::{PartHistory, PlacementEvent};
use rusqlite::{params, Connection};

use super::{from_millis, to_millis};
use crate::sql_err;

/// Insert a batch of placement events.
pub fn insert_events(conn: &Connection, events: &[PlacementEvent]) -> Result<usize, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO putaway_events (part_id, slot_code, client_id, actor, occurred_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(sql_err)?;

    let mut count = 0;
    for e in events {
        stmt.execute(params![
            e.part_id,
            e.slot_code,
            e.client_id,
            e.actor,
            to_millis(e.occurred_at),
        ])
        .map_err(sql_err)?;
        count += 1;
    }
    Ok(count)
}

pub fn count_events(conn: &Connection) -> Result<u64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM putaway_events", [], |row| row.get::<_, i64>(0))
        .map(|n| n as u64)
        .map_err(sql_err)
}

/// One part's events, oldest first.
pub fn events_for_part(conn: &Connection, part_id: i64) -> Result<Vec<PlacementEvent>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT part_id, slot_code, client_id, actor, occurred_at
             FROM putaway_events WHERE part_id = ?1 ORDER BY occurred_at, id",
        )
        .map_err(sql_err)?;

    let rows = stmt
        .query_map(params![part_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })
        .map_err(sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_err)?;

    rows.into_iter()
        .map(|(part_id, slot_code, client_id, actor, occurred_at)| {
            Ok(PlacementEvent {
                part_id,
                slot_code,
                client_id,
                actor,
                occurred_at: from_millis(occurred_at)?,
            })
        })
        .collect()
}

/// Every part's history, grouped by part id and joined with the part code
/// and owning client name where known.
pub fn load_part_histories(conn: &Connection) -> Result<Vec<PartHistory>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT e.part_id, e.slot_code, e.client_id, e.actor, e.occurred_at,
                    p.part_code, COALESCE(p.client_id, e.client_id), c.name
             FROM putaway_events e
             LEFT JOIN parts p ON p.part_id = e.part_id
             LEFT JOIN clients c ON c.client_id = COALESCE(p.client_id, e.client_id)
             ORDER BY e.part_id, e.occurred_at, e.id",
        )
        .map_err(sql_err)?;

    let mut rows = stmt.query([]).map_err(sql_err)?;
    let mut histories: Vec<PartHistory> = Vec::new();

    while let Some(row) = rows.next().map_err(sql_err)? {
        let part_id: i64 = row.get(0).map_err(sql_err)?;
        let event = PlacementEvent {
            part_id,
            slot_code: row.get(1).map_err(sql_err)?,
            client_id: row.get(2).map_err(sql_err)?,
            actor: row.get(3).map_err(sql_err)?,
            occurred_at: from_millis(row.get(4).map_err(sql_err)?)?,
        };

        match histories.last_mut() {
            Some(h) if h.part_id == part_id => h.events.push(event),
            _ => {
                let mut history = PartHistory::new(part_id);
                history.part_code = row.get(5).map_err(sql_err)?;
                history.client_id = row.get(6).map_err(sql_err)?;
                history.client_name = row.get(7).map_err(sql_err)?;
                history.events.push(event);
                histories.push(history);
            }
        }
    }

    Ok(histories)
}
