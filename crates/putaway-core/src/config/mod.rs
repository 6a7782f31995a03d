//! Layered configuration: defaults, then `putaway.toml`, then environment.

pub mod putaway_config;

pub use putaway_config::{
    ExplanationConfig, LocationConfig, LoggingConfig, PutawayConfig, RecommendConfig,
    ResilienceConfig, StorageConfig,
};
