//! Schema migrations tracked by `PRAGMA user_version`.

mod v001_initial;

use putaway_core::errors::StorageError;
use rusqlite::Connection;
use tracing::info;

/// Ordered (version, DDL) pairs.
const MIGRATIONS: &[(u32, &str)] = &[(1, v001_initial::SQL)];

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(v, _)| *v)
}

pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::Migration {
            version: 0,
            message: e.to_string(),
        })
}

/// Apply every migration newer than the stored version, each in its own
/// transaction. Returns the number applied.
pub fn run_migrations(conn: &mut Connection) -> Result<usize, StorageError> {
    let current = current_version(conn)?;
    let mut applied = 0;

    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let fail = move |e: rusqlite::Error| StorageError::Migration {
            version,
            message: e.to_string(),
        };
        let tx = conn.transaction().map_err(fail)?;
        tx.execute_batch(sql).map_err(fail)?;
        tx.pragma_update(None, "user_version", version).map_err(fail)?;
        tx.commit().map_err(fail)?;
        info!(version, "applied schema migration");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&mut conn).unwrap(), MIGRATIONS.len());
        assert_eq!(current_version(&conn).unwrap(), latest_version());
        assert_eq!(run_migrations(&mut conn).unwrap(), 0);
    }

    #[test]
    fn test_tables_exist() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        for table in ["clients", "parts", "putaway_events", "locations", "part_patterns", "audit_log"] {
            let n: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(n, 1, "missing table {table}");
        }
    }
}
