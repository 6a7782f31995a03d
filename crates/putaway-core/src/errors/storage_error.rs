use thiserror::Error;

/// Failures in the pattern store, event source, or occupancy tables.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("lock poisoned: {what}")]
    LockPoisoned { what: &'static str },

    #[error("migration failed at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
