use std::sync::Arc;

use crate::errors::ExplanationError;
use crate::types::ExplanationContext;

/// Turns a recommendation into operator-facing text.
pub trait ExplanationGenerator: Send + Sync {
    fn explain(&self, context: &ExplanationContext) -> Result<String, ExplanationError>;
}

impl<T: ExplanationGenerator + ?Sized> ExplanationGenerator for Arc<T> {
    fn explain(&self, context: &ExplanationContext) -> Result<String, ExplanationError> {
        (**self).explain(context)
    }
}
