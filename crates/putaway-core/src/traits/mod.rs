//! Capability traits for the engine's collaborators.
//!
//! The engine receives these as `Arc<dyn ...>`; connection pools and
//! clients live behind the implementations.

pub mod audit;
pub mod cancellation;
pub mod events;
pub mod explain;
pub mod oracle;
pub mod store;

pub use audit::{AuditSink, NoOpAuditSink};
pub use cancellation::CancellationToken;
pub use events::EventSource;
pub use explain::ExplanationGenerator;
pub use oracle::AvailabilityOracle;
pub use store::PatternStore;
