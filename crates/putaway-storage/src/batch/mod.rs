//! Background writer for high-volume appends (audit records, events).

pub mod commands;
pub mod writer;

pub use commands::BatchCommand;
pub use writer::{BatchWriter, WriteStats};
