//! Request-time decision policy: stored pattern → valid slots → live
//! availability → ranked recommendation with explanation.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use putaway_core::config::{PutawayConfig, RecommendConfig};
use putaway_core::constants::DEFAULT_MAX_ALTERNATIVES;
use putaway_core::errors::{RecommendError, StorageError};
use putaway_core::traits::{
    AuditSink, AvailabilityOracle, CancellationToken, ExplanationGenerator, NoOpAuditSink,
    PatternStore,
};
use putaway_core::types::{
    AuditEvent, ExplanationContext, LocationHint, LocationUsage, PartPattern,
    RecommendationOutcome, RecommendationResult, SlotCandidate,
};

use crate::location::LocationParser;

use super::availability::{check_candidates, LookupOutcome};
use super::explanation::{all_occupied_guidance, fallback_explanation, no_history_guidance};
use super::resilient::{Resilient, RetryPolicy};

/// Engine knobs taken from `[recommend]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub max_alternatives: usize,
    pub enable_audit_log: bool,
    pub audit_user: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            enable_audit_log: true,
            audit_user: "system".to_string(),
        }
    }
}

impl From<&RecommendConfig> for EngineConfig {
    fn from(config: &RecommendConfig) -> Self {
        Self {
            max_alternatives: config.max_alternatives,
            enable_audit_log: config.enable_audit_log,
            audit_user: config.audit_user.clone(),
        }
    }
}

/// Stateless per request; share it behind an `Arc`.
pub struct RecommendationEngine {
    store: Arc<dyn PatternStore>,
    oracle: Arc<dyn AvailabilityOracle>,
    explainer: Arc<dyn ExplanationGenerator>,
    audit: Arc<dyn AuditSink>,
    parser: LocationParser,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(
        store: Arc<dyn PatternStore>,
        oracle: Arc<dyn AvailabilityOracle>,
        explainer: Arc<dyn ExplanationGenerator>,
    ) -> Self {
        Self {
            store,
            oracle,
            explainer,
            audit: Arc::new(NoOpAuditSink),
            parser: LocationParser::default(),
            config: EngineConfig::default(),
        }
    }

    /// Wire an engine from loaded config. Store and oracle are wrapped in
    /// the configured retry policy.
    pub fn from_config<S, O>(
        config: &PutawayConfig,
        store: S,
        oracle: O,
        explainer: Arc<dyn ExplanationGenerator>,
    ) -> Self
    where
        S: PatternStore + 'static,
        O: AvailabilityOracle + 'static,
    {
        let policy = RetryPolicy::from_config(&config.resilience);
        Self::new(
            Arc::new(Resilient::new(store, policy.clone())),
            Arc::new(Resilient::new(oracle, policy)),
            explainer,
        )
        .with_parser(LocationParser::new(config.location.virtual_prefixes.iter()))
        .with_config(EngineConfig::from(&config.recommend))
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_parser(mut self, parser: LocationParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parser(&self) -> &LocationParser {
        &self.parser
    }

    pub fn recommend(&self, part_id: i64) -> Result<RecommendationResult, RecommendError> {
        self.recommend_with_cancellation(part_id, &CancellationToken::new())
    }

    pub fn recommend_with_cancellation(
        &self,
        part_id: i64,
        token: &CancellationToken,
    ) -> Result<RecommendationResult, RecommendError> {
        if token.is_cancelled() {
            return Err(RecommendError::Cancelled { part_id });
        }

        let stored = match self.store.get(part_id) {
            Ok(stored) => stored,
            Err(source) => {
                let err = RecommendError::StoreUnavailable { part_id, source };
                error!(part_id, error = %err, "pattern lookup failed");
                self.audit(AuditEvent::Error {
                    timestamp: Utc::now(),
                    error_type: err.kind().to_string(),
                    error_message: err.to_string(),
                    part_id: Some(part_id),
                });
                return Err(err);
            }
        };

        let pattern = match stored {
            Some(pattern) if pattern.has_history() => pattern,
            other => return Ok(self.no_history(part_id, other.as_deref())),
        };

        let candidates: Vec<&LocationUsage> = pattern
            .locations
            .iter()
            .filter(|usage| self.parser.is_valid(Some(&usage.code)))
            .collect();

        let checks = check_candidates(self.oracle.as_ref(), &candidates, token);
        if token.is_cancelled() {
            info!(part_id, "recommendation cancelled");
            return Err(RecommendError::Cancelled { part_id });
        }

        let mut free: Vec<SlotCandidate> = checks
            .iter()
            .filter(|check| check.is_free())
            .map(|check| SlotCandidate {
                code: check.usage.code.clone(),
                status: check.outcome.status(),
                usage_count: check.usage.count,
                usage_percentage: check.usage.percentage,
            })
            .collect();

        if free.is_empty() {
            let failed = checks
                .iter()
                .filter(|c| c.outcome == LookupOutcome::Failed)
                .count();
            if !checks.is_empty() && failed == checks.len() {
                warn!(part_id, lookups = failed, "every availability lookup failed; oracle degraded");
            } else {
                info!(
                    part_id,
                    candidates = checks.len(),
                    failed,
                    "all historical slots occupied"
                );
            }
            return Ok(self.all_occupied(&pattern));
        }

        let recommended = free.remove(0);
        free.truncate(self.config.max_alternatives);
        let alternatives = free;

        let explanation = self.explain(&pattern, &recommended);

        info!(
            part_id,
            slot = %recommended.code,
            usage_pct = recommended.usage_percentage,
            alternatives = alternatives.len(),
            "recommended"
        );
        self.audit(AuditEvent::Recommendation {
            timestamp: Utc::now(),
            user: self.config.audit_user.clone(),
            part_id,
            part_code: pattern.part_code.clone(),
            recommended_location: recommended.code.clone(),
            status: recommended.status.name().to_string(),
            usage_count: recommended.usage_count,
            usage_percentage: recommended.usage_percentage,
            alternatives_count: alternatives.len(),
        });

        Ok(RecommendationResult {
            part_id,
            outcome: RecommendationOutcome::Recommended,
            recommended: Some(recommended),
            alternatives,
            hint: None,
            explanation,
            total_events: pattern.total_events,
            metrics: pattern.metrics.clone(),
        })
    }

    /// Record that the operator put the part somewhere other than the
    /// recommended slot. A no-op when the audit log is disabled; otherwise
    /// sink errors are returned to the caller.
    pub fn record_override(
        &self,
        user: &str,
        part_id: i64,
        part_code: Option<&str>,
        recommended_location: &str,
        actual_location: &str,
        reason: &str,
    ) -> Result<(), StorageError> {
        info!(part_id, recommended_location, actual_location, "recommendation overridden");
        if !self.config.enable_audit_log {
            return Ok(());
        }
        self.audit.record(AuditEvent::Override {
            timestamp: Utc::now(),
            user: user.to_string(),
            part_id,
            part_code: part_code.map(str::to_string),
            recommended_location: recommended_location.to_string(),
            actual_location: actual_location.to_string(),
            reason: reason.to_string(),
        })
    }

    fn no_history(&self, part_id: i64, pattern: Option<&PartPattern>) -> RecommendationResult {
        let hint = pattern.and_then(location_hint);
        let zone = hint.as_ref().and_then(|h| h.zone.as_deref());
        info!(part_id, zone = zone.unwrap_or("-"), "no putaway history");
        RecommendationResult {
            part_id,
            outcome: RecommendationOutcome::NoHistory,
            recommended: None,
            alternatives: Vec::new(),
            explanation: no_history_guidance(zone),
            hint,
            total_events: pattern.map_or(0, |p| p.total_events),
            metrics: pattern.and_then(|p| p.metrics.clone()),
        }
    }

    fn all_occupied(&self, pattern: &PartPattern) -> RecommendationResult {
        let hint = location_hint(pattern);
        RecommendationResult {
            part_id: pattern.part_id,
            outcome: RecommendationOutcome::AllOccupied,
            recommended: None,
            alternatives: Vec::new(),
            explanation: all_occupied_guidance(pattern.primary_zone.as_deref()),
            hint,
            total_events: pattern.total_events,
            metrics: pattern.metrics.clone(),
        }
    }

    fn explain(&self, pattern: &PartPattern, recommended: &SlotCandidate) -> String {
        let context = ExplanationContext {
            part_code: pattern
                .part_code
                .clone()
                .unwrap_or_else(|| pattern.part_id.to_string()),
            client_name: pattern
                .client_name
                .clone()
                .unwrap_or_else(|| "unknown client".to_string()),
            recommended_slot: recommended.code.clone(),
            usage_count: recommended.usage_count,
            usage_percentage: recommended.usage_percentage,
        };
        let fallback = || fallback_explanation(&recommended.code, recommended.usage_percentage);

        match panic::catch_unwind(AssertUnwindSafe(|| self.explainer.explain(&context))) {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                warn!(part_id = pattern.part_id, "explainer returned empty text, using fallback");
                fallback()
            }
            Ok(Err(e)) => {
                warn!(part_id = pattern.part_id, error = %e, "explainer failed, using fallback");
                fallback()
            }
            Err(_) => {
                warn!(part_id = pattern.part_id, "explainer panicked, using fallback");
                fallback()
            }
        }
    }

    fn audit(&self, event: AuditEvent) {
        if !self.config.enable_audit_log {
            return;
        }
        let kind = event.kind();
        if let Err(e) = self.audit.record(event) {
            warn!(kind, error = %e, "failed to record audit event");
        }
    }
}

/// Zone/aisle guidance from a pattern's distributions.
fn location_hint(pattern: &PartPattern) -> Option<LocationHint> {
    let hint = LocationHint {
        zone: pattern.primary_zone.clone(),
        zone_percentage: pattern
            .primary_zone
            .as_ref()
            .and_then(|z| pattern.zone_distribution.get(z).copied()),
        aisle: pattern.primary_aisle.clone(),
        aisle_percentage: pattern
            .primary_aisle
            .as_ref()
            .and_then(|a| pattern.aisle_distribution.get(a).copied()),
    };
    (!hint.is_empty()).then_some(hint)
}

impl std::fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("parser", &self.parser)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
