//! Per-part aggregation and the offline rebuild pipeline.

pub mod aggregator;
pub mod distribution;
pub mod pipeline;

pub use aggregator::PatternAggregator;
pub use distribution::Distribution;
pub use pipeline::{RebuildOutput, RebuildPipeline, RebuildStats};
