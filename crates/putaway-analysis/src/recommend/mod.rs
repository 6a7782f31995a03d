//! The request-time decision engine and its collaborator plumbing.

pub mod availability;
pub mod engine;
pub mod explanation;
pub mod resilient;

pub use availability::{check_candidates, CandidateCheck, LookupOutcome};
pub use engine::{EngineConfig, RecommendationEngine};
pub use resilient::{Resilient, RetryPolicy};
