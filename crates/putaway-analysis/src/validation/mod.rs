//! Batch validation: run the engine over many parts and summarize.

pub mod report;

pub use report::{validate, ValidationCase, ValidationReport};
