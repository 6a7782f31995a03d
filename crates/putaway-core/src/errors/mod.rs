//! Error types, one enum per concern.

pub mod collaborator_error;
pub mod config_error;
pub mod recommend_error;
pub mod storage_error;

pub use collaborator_error::{ExplanationError, OracleError};
pub use config_error::ConfigError;
pub use recommend_error::RecommendError;
pub use storage_error::StorageError;
