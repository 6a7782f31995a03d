use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use putaway_core::types::{PatternStrength, RecommendationOutcome, SlotStatus};

use crate::patterns::round2;
use crate::recommend::RecommendationEngine;

/// One part's validation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCase {
    pub part_id: i64,
    /// `None` when the engine returned an error.
    pub outcome: Option<RecommendationOutcome>,
    pub recommended_location: Option<String>,
    pub location_status: Option<SlotStatus>,
    pub usage_count: Option<u64>,
    pub usage_percentage: Option<f64>,
    pub strength: Option<PatternStrength>,
    pub confidence: Option<f64>,
    pub error: Option<String>,
}

impl ValidationCase {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate over a validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub parts: usize,
    pub recommended: usize,
    pub no_history: usize,
    pub all_occupied: usize,
    pub errors: usize,
    /// Count per strength tier name, over parts that had metrics.
    pub by_strength: BTreeMap<String, usize>,
    /// Mean confidence over parts that had metrics, rounded to 2 decimals.
    pub mean_confidence: Option<f64>,
    /// Share of parts that got a slot, in percent.
    pub recommendation_rate: f64,
    pub execution_time_ms: u64,
    pub cases: Vec<ValidationCase>,
}

impl ValidationReport {
    pub fn from_cases(cases: Vec<ValidationCase>) -> Self {
        let mut report = Self {
            parts: cases.len(),
            ..Self::default()
        };
        let mut confidence_sum = 0.0;
        let mut scored = 0usize;

        for case in &cases {
            match case.outcome {
                Some(RecommendationOutcome::Recommended) => report.recommended += 1,
                Some(RecommendationOutcome::NoHistory) => report.no_history += 1,
                Some(RecommendationOutcome::AllOccupied) => report.all_occupied += 1,
                None => report.errors += 1,
            }
            if let Some(strength) = case.strength {
                *report.by_strength.entry(strength.name().to_string()).or_default() += 1;
            }
            if let Some(c) = case.confidence {
                confidence_sum += c;
                scored += 1;
            }
        }

        if scored > 0 {
            report.mean_confidence = Some(round2(confidence_sum / scored as f64));
        }
        if report.parts > 0 {
            report.recommendation_rate =
                round2(report.recommended as f64 / report.parts as f64 * 100.0);
        }
        report.cases = cases;
        report
    }
}

/// Run `engine` for every part id. Cases come back in input order.
pub fn validate(engine: &RecommendationEngine, part_ids: &[i64]) -> ValidationReport {
    let start = Instant::now();
    let cases: Vec<ValidationCase> = part_ids
        .par_iter()
        .map(|&part_id| match engine.recommend(part_id) {
            Ok(result) => {
                let slot = result.recommended.as_ref();
                ValidationCase {
                    part_id,
                    outcome: Some(result.outcome),
                    recommended_location: slot.map(|s| s.code.clone()),
                    location_status: slot.map(|s| s.status),
                    usage_count: slot.map(|s| s.usage_count),
                    usage_percentage: slot.map(|s| s.usage_percentage),
                    strength: result.metrics.as_ref().map(|m| m.strength),
                    confidence: result.metrics.as_ref().map(|m| m.confidence),
                    error: None,
                }
            }
            Err(e) => ValidationCase {
                part_id,
                outcome: None,
                recommended_location: None,
                location_status: None,
                usage_count: None,
                usage_percentage: None,
                strength: None,
                confidence: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let mut report = ValidationReport::from_cases(cases);
    report.execution_time_ms = start.elapsed().as_millis() as u64;
    info!(
        parts = report.parts,
        recommended = report.recommended,
        no_history = report.no_history,
        all_occupied = report.all_occupied,
        errors = report.errors,
        "validation finished"
    );
    report
}
