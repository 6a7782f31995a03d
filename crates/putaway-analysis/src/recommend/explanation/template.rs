//! Deterministic, always-succeeding explanations.

use std::fmt;

use putaway_core::errors::ExplanationError;
use putaway_core::traits::ExplanationGenerator;
use putaway_core::types::ExplanationContext;

/// How strongly the history backs a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    MostPreferred,
    Frequent,
    Historical,
    Available,
}

impl Emphasis {
    pub fn for_usage(usage_percentage: f64, usage_count: u64) -> Self {
        if usage_percentage >= 50.0 {
            Self::MostPreferred
        } else if usage_percentage >= 20.0 {
            Self::Frequent
        } else if usage_count >= 5 {
            Self::Historical
        } else {
            Self::Available
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Self::MostPreferred => "most preferred location",
            Self::Frequent => "frequently used location",
            Self::Historical => "historically used location",
            Self::Available => "available location from historical patterns",
        }
    }

    /// Parenthetical detail for the usage share.
    pub fn detail(&self, usage_percentage: f64) -> String {
        match self {
            Self::MostPreferred => format!("used for majority ({usage_percentage:.1}%) of putaways"),
            Self::Frequent => format!("commonly used ({usage_percentage:.1}% of times)"),
            Self::Historical => "previously used multiple times".to_string(),
            Self::Available => "based on available historical data".to_string(),
        }
    }
}

impl fmt::Display for Emphasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn render(context: &ExplanationContext) -> String {
        let emphasis = Emphasis::for_usage(context.usage_percentage, context.usage_count);
        format!(
            "Location {} is the {} for part {} ({}). It is currently FREE and ready for immediate use.",
            context.recommended_slot,
            emphasis,
            context.part_code,
            emphasis.detail(context.usage_percentage),
        )
    }
}

impl ExplanationGenerator for TemplateExplainer {
    fn explain(&self, context: &ExplanationContext) -> Result<String, ExplanationError> {
        Ok(Self::render(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pct: f64, count: u64) -> ExplanationContext {
        ExplanationContext {
            part_code: "BRK-100".into(),
            client_name: "Acme".into(),
            recommended_slot: "TN52D".into(),
            usage_count: count,
            usage_percentage: pct,
        }
    }

    #[test]
    fn test_emphasis_tiers() {
        assert_eq!(Emphasis::for_usage(50.0, 1), Emphasis::MostPreferred);
        assert_eq!(Emphasis::for_usage(49.99, 1), Emphasis::Frequent);
        assert_eq!(Emphasis::for_usage(20.0, 1), Emphasis::Frequent);
        assert_eq!(Emphasis::for_usage(5.66, 5), Emphasis::Historical);
        assert_eq!(Emphasis::for_usage(5.66, 4), Emphasis::Available);
    }

    #[test]
    fn test_render() {
        let text = TemplateExplainer.explain(&ctx(62.5, 10)).unwrap();
        assert_eq!(
            text,
            "Location TN52D is the most preferred location for part BRK-100 \
             (used for majority (62.5%) of putaways). It is currently FREE and ready for immediate use."
        );
    }
}
