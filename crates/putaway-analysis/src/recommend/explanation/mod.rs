//! Explanation generators and the deterministic texts used when they fail.

pub mod fallback;
pub mod ollama;
pub mod template;

pub use fallback::{all_occupied_guidance, fallback_explanation, no_history_guidance};
pub use ollama::OllamaExplainer;
pub use template::{Emphasis, TemplateExplainer};

use std::sync::Arc;

use putaway_core::config::ExplanationConfig;
use putaway_core::traits::ExplanationGenerator;

/// Pick the explainer for a config: Ollama when a URL is set, otherwise
/// the template explainer.
pub fn from_config(config: &ExplanationConfig) -> Arc<dyn ExplanationGenerator> {
    match config.ollama_url.as_deref() {
        Some(url) if !url.trim().is_empty() => match OllamaExplainer::from_config(url, config) {
            Ok(explainer) => Arc::new(explainer),
            Err(e) => {
                tracing::warn!(error = %e, "failed to build Ollama client, using template explanations");
                Arc::new(TemplateExplainer)
            }
        },
        _ => Arc::new(TemplateExplainer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use putaway_core::types::ExplanationContext;

    #[test]
    fn test_defaults_to_template() {
        let explainer = from_config(&ExplanationConfig::default());
        let text = explainer
            .explain(&ExplanationContext {
                part_code: "BRK-100".into(),
                client_name: "Acme".into(),
                recommended_slot: "TN52D".into(),
                usage_count: 1,
                usage_percentage: 100.0,
            })
            .unwrap();
        assert!(text.contains("most preferred location"));
    }
}
