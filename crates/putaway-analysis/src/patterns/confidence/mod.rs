//! Pattern strength, consistency, recency, and the composite confidence score.

pub mod factors;
pub mod scorer;

pub use scorer::ConfidenceScorer;
