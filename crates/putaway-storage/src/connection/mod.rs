//! Connection management: one serialized writer plus a round-robin
//! pool of read-only connections.

pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use putaway_core::config::PutawayConfig;
use putaway_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::migrations;
use crate::sql_err;

pub use writer::with_immediate_transaction;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_READ_POOL_SIZE: usize = 4;

pub struct DatabaseManager {
    path: Option<PathBuf>,
    busy_timeout: Duration,
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
}

impl DatabaseManager {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_with_pool(path, DEFAULT_READ_POOL_SIZE)
    }

    /// Path and pool size from `[storage]`; the request timeout bounds how
    /// long any connection waits on a lock.
    pub fn open_from_config(config: &PutawayConfig) -> Result<Self, StorageError> {
        Self::open_with_options(
            &config.storage.db_path,
            config.storage.read_pool_size,
            config.resilience.request_timeout(),
        )
    }

    pub fn open_with_pool(path: &Path, read_pool_size: usize) -> Result<Self, StorageError> {
        Self::open_with_options(path, read_pool_size, BUSY_TIMEOUT)
    }

    /// Open (creating if needed) a database file and run pending migrations.
    pub fn open_with_options(
        path: &Path,
        read_pool_size: usize,
        busy_timeout: Duration,
    ) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Unavailable {
                message: format!("failed to create {}: {e}", parent.display()),
            })?;
        }

        let mut writer = Connection::open(path).map_err(sql_err)?;
        configure_writer(&writer, busy_timeout)?;
        migrations::run_migrations(&mut writer)?;

        let mut readers = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(sql_err)?;
            conn.busy_timeout(busy_timeout).map_err(sql_err)?;
            readers.push(Mutex::new(conn));
        }

        debug!(path = %path.display(), readers = read_pool_size, "database opened");
        Ok(Self {
            path: Some(path.to_path_buf()),
            busy_timeout,
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
        })
    }

    /// Private in-memory database. Reads go through the writer connection.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let mut writer = Connection::open_in_memory().map_err(sql_err)?;
        writer
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(sql_err)?;
        migrations::run_migrations(&mut writer)?;
        Ok(Self {
            path: None,
            busy_timeout: BUSY_TIMEOUT,
            writer: Mutex::new(writer),
            readers: Vec::new(),
            next_reader: AtomicUsize::new(0),
        })
    }

    /// `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StorageError>,
    {
        let mut conn = self
            .writer
            .lock()
            .map_err(|_| StorageError::LockPoisoned { what: "writer connection" })?;
        f(&mut conn)
    }

    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        if self.readers.is_empty() {
            return self.with_writer(|conn| f(conn));
        }
        let idx = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|_| StorageError::LockPoisoned { what: "reader connection" })?;
        f(&conn)
    }

    /// A fresh write connection to the same file, for the batch writer thread.
    pub fn open_batch_connection(&self) -> Result<Connection, StorageError> {
        let path = self.path.as_deref().ok_or_else(|| StorageError::Unavailable {
            message: "in-memory database has no path for a second writer".to_string(),
        })?;
        let conn = Connection::open(path).map_err(sql_err)?;
        configure_writer(&conn, self.busy_timeout)?;
        Ok(conn)
    }
}

impl std::fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseManager")
            .field("path", &self.path)
            .field("readers", &self.readers.len())
            .finish()
    }
}

fn configure_writer(conn: &Connection, busy_timeout: Duration) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;",
    )
    .map_err(sql_err)?;
    conn.busy_timeout(busy_timeout).map_err(sql_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("putaway.db");
        let db = DatabaseManager::open_with_pool(&path, 2).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), Some(path.as_path()));

        let mode: String = db
            .with_writer(|conn| {
                conn.query_row("PRAGMA journal_mode", [], |r| r.get(0))
                    .map_err(sql_err)
            })
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_readers_see_committed_writes() {
        let dir = tempfile::tempdir().unwrap();
        let db = DatabaseManager::open_with_pool(&dir.path().join("t.db"), 2).unwrap();
        db.with_writer(|conn| {
            conn.execute("INSERT INTO clients (client_id, name) VALUES (1, 'Acme')", [])
                .map_err(sql_err)?;
            Ok(())
        })
        .unwrap();
        for _ in 0..3 {
            let name: String = db
                .with_reader(|conn| {
                    conn.query_row("SELECT name FROM clients WHERE client_id = 1", [], |r| r.get(0))
                        .map_err(sql_err)
                })
                .unwrap();
            assert_eq!(name, "Acme");
        }
    }

    #[test]
    fn test_reader_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let db = DatabaseManager::open_with_pool(&dir.path().join("t.db"), 1).unwrap();
        let result = db.with_reader(|conn| {
            conn.execute("INSERT INTO clients (client_id, name) VALUES (2, 'X')", [])
                .map_err(sql_err)
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_open_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PutawayConfig::default();
        config.storage.db_path = dir.path().join("cfg.db");
        config.storage.read_pool_size = 1;
        let db = DatabaseManager::open_from_config(&config).unwrap();
        assert_eq!(db.path(), Some(config.storage.db_path.as_path()));
        assert_eq!(db.readers.len(), 1);
    }

    #[test]
    fn test_in_memory_has_no_batch_connection() {
        let db = DatabaseManager::open_in_memory().unwrap();
        assert!(db.path().is_none());
        assert!(db.open_batch_connection().is_err());
    }
}
