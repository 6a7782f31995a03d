//! # putaway-core
//!
//! Core types, collaborator traits, errors, config, logging, and constants
//! for the putaway recommendation engine.

#![allow(clippy::module_inception)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod traits;
pub mod types;

pub use config::PutawayConfig;
pub use errors::{ConfigError, ExplanationError, OracleError, RecommendError, StorageError};
