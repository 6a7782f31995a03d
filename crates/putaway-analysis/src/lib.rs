//! # putaway-analysis
//!
//! Pattern extraction and recommendation for the putaway engine:
//! location code parsing, per-part aggregation, confidence scoring,
//! the batch rebuild pipeline, and the availability-filtered
//! recommendation engine.

#![allow(clippy::module_inception)]

pub mod location;
pub mod patterns;
pub mod recommend;
pub mod validation;

pub use location::LocationParser;
pub use patterns::aggregation::{PatternAggregator, RebuildPipeline, RebuildStats};
pub use patterns::confidence::ConfidenceScorer;
pub use recommend::{RecommendationEngine, Resilient, RetryPolicy};
pub use recommend::explanation::{OllamaExplainer, TemplateExplainer};
pub use validation::{validate, ValidationReport};
