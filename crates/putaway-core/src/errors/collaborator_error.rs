use std::time::Duration;

use thiserror::Error;

/// A single availability lookup failed. Absorbed per slot by the engine.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("availability lookup for {slot} failed: {message}")]
    LookupFailed { slot: String, message: String },

    #[error("availability lookup for {slot} timed out after {timeout:?}")]
    Timeout { slot: String, timeout: Duration },
}

/// The explanation generator could not produce text. Never surfaced to callers.
#[derive(Debug, Error)]
pub enum ExplanationError {
    #[error("explanation request timed out")]
    Timeout,

    #[error("explanation transport error: {message}")]
    Transport { message: String },

    #[error("explanation service returned status {status}")]
    Status { status: u16 },

    #[error("malformed explanation response: {message}")]
    Malformed { message: String },

    #[error("explanation service returned empty text")]
    Empty,
}
