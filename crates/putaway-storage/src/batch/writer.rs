//! Dedicated writer thread with crossbeam-channel bounded(1024).
//! Batches writes into single transactions for throughput.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use putaway_core::errors::StorageError;
use rusqlite::Connection;
use tracing::{debug, error};

use super::commands::BatchCommand;
use crate::queries::{audit, events};

const CHANNEL_BOUND: usize = 1024;
const BATCH_SIZE: usize = 500;
const FLUSH_TIMEOUT: Duration = Duration::from_millis(100);

/// Statistics from the batch writer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WriteStats {
    pub audit_rows: usize,
    pub event_rows: usize,
    pub flushes: usize,
}

/// Accepts commands via a channel and writes them in batched transactions
/// on a dedicated thread.
pub struct BatchWriter {
    tx: Sender<BatchCommand>,
    handle: Option<JoinHandle<Result<WriteStats, StorageError>>>,
}

impl BatchWriter {
    /// Spawn the writer thread. The `conn` is moved to it.
    pub fn new(conn: Connection) -> Result<Self, StorageError> {
        let (tx, rx) = bounded(CHANNEL_BOUND);

        let handle = thread::Builder::new()
            .name("putaway-batch-writer".to_string())
            .spawn(move || writer_loop(conn, rx))
            .map_err(|e| StorageError::Unavailable {
                message: format!("failed to spawn batch writer thread: {e}"),
            })?;

        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    pub fn send(&self, cmd: BatchCommand) -> Result<(), StorageError> {
        self.tx.send(cmd).map_err(|_| StorageError::Unavailable {
            message: "batch writer channel disconnected".to_string(),
        })
    }

    /// Ask the writer to commit what it has buffered. Does not wait.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.send(BatchCommand::Flush)
    }

    /// Shut down the writer thread and wait for completion.
    pub fn shutdown(mut self) -> Result<WriteStats, StorageError> {
        self.join()
    }

    fn join(&mut self) -> Result<WriteStats, StorageError> {
        let _ = self.tx.send(BatchCommand::Shutdown);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| StorageError::Unavailable {
                message: "batch writer thread panicked".to_string(),
            })?,
            None => Ok(WriteStats::default()),
        }
    }
}

impl Drop for BatchWriter {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            error!(error = %e, "batch writer stopped with an error");
        }
    }
}

fn writer_loop(conn: Connection, rx: Receiver<BatchCommand>) -> Result<WriteStats, StorageError> {
    let mut buffer: Vec<BatchCommand> = Vec::with_capacity(BATCH_SIZE);
    let mut stats = WriteStats::default();

    loop {
        match rx.recv_timeout(FLUSH_TIMEOUT) {
            Ok(BatchCommand::Shutdown) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
                break;
            }
            Ok(BatchCommand::Flush) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
            }
            Ok(cmd) => {
                buffer.push(cmd);
                if buffer.len() >= BATCH_SIZE {
                    flush_buffer(&conn, &mut buffer, &mut stats)?;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if !buffer.is_empty() {
                    flush_buffer(&conn, &mut buffer, &mut stats)?;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
                break;
            }
        }
    }

    debug!(?stats, "batch writer finished");
    Ok(stats)
}

fn flush_buffer(
    conn: &Connection,
    buffer: &mut Vec<BatchCommand>,
    stats: &mut WriteStats,
) -> Result<(), StorageError> {
    if buffer.is_empty() {
        return Ok(());
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| StorageError::SqliteError {
            message: format!("begin transaction: {e}"),
        })?;

    for cmd in buffer.drain(..) {
        match cmd {
            BatchCommand::InsertAudit(rows) => {
                stats.audit_rows += audit::insert_audit_events(&tx, &rows)?;
            }
            BatchCommand::InsertEvents(rows) => {
                stats.event_rows += events::insert_events(&tx, &rows)?;
            }
            BatchCommand::Flush | BatchCommand::Shutdown => {}
        }
    }

    tx.commit().map_err(|e| StorageError::SqliteError {
        message: format!("commit: {e}"),
    })?;
    stats.flushes += 1;

    Ok(())
}
