//! Domain types shared by the analysis and storage crates.

pub mod audit;
pub mod collections;
pub mod events;
pub mod location;
pub mod pattern;
pub mod recommendation;

pub use audit::AuditEvent;
pub use events::{PartHistory, PlacementEvent};
pub use location::LocationCode;
pub use pattern::{LocationUsage, PartPattern, PatternMetrics, PatternStrength, RecencyStatus};
pub use recommendation::{
    ExplanationContext, LocationHint, RecommendationOutcome, RecommendationResult, SlotCandidate,
    SlotStatus,
};
