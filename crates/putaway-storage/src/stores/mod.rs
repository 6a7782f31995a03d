//! Implementations of the engine's collaborator traits.

pub mod audit_sink;
pub mod cached;
pub mod event_source;
pub mod memory;
pub mod oracle;
pub mod pattern_store;

pub use audit_sink::SqliteAuditSink;
pub use cached::CachedPatternStore;
pub use event_source::SqliteEventSource;
pub use memory::InMemoryPatternStore;
pub use oracle::SqliteAvailabilityOracle;
pub use pattern_store::SqlitePatternStore;
