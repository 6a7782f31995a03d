//! Parallel availability lookups for one request.

use rayon::prelude::*;
use tracing::{debug, warn};

use putaway_core::traits::{AvailabilityOracle, CancellationToken};
use putaway_core::types::{LocationUsage, SlotStatus};

/// What happened to one candidate's lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Checked(SlotStatus),
    /// The oracle errored; the slot is treated as `Unknown`.
    Failed,
    /// Cancelled before the lookup was issued, or while it was retrying.
    Skipped,
}

impl LookupOutcome {
    /// Effective status used for filtering.
    pub fn status(&self) -> SlotStatus {
        match self {
            Self::Checked(status) => *status,
            Self::Failed | Self::Skipped => SlotStatus::Unknown,
        }
    }
}

/// A ranked slot paired with its lookup outcome.
#[derive(Debug, Clone)]
pub struct CandidateCheck<'a> {
    pub usage: &'a LocationUsage,
    pub outcome: LookupOutcome,
}

impl CandidateCheck<'_> {
    pub fn is_free(&self) -> bool {
        self.outcome.status().is_available()
    }
}

/// Look up every candidate on the rayon pool, keeping input order.
///
/// Oracle errors are absorbed per slot. The token is checked before each
/// lookup is issued and handed to the oracle so retries stop on cancel; a
/// lookup that fails after cancellation counts as skipped.
pub fn check_candidates<'a>(
    oracle: &dyn AvailabilityOracle,
    candidates: &[&'a LocationUsage],
    token: &CancellationToken,
) -> Vec<CandidateCheck<'a>> {
    candidates
        .par_iter()
        .map(|usage| {
            if token.is_cancelled() {
                return CandidateCheck {
                    usage,
                    outcome: LookupOutcome::Skipped,
                };
            }
            let outcome = match oracle.check_with_cancellation(&usage.code, token) {
                Ok(status) => {
                    debug!(slot = %usage.code, %status, "availability checked");
                    LookupOutcome::Checked(status)
                }
                Err(_) if token.is_cancelled() => LookupOutcome::Skipped,
                Err(e) => {
                    warn!(slot = %usage.code, error = %e, "availability lookup failed, treating slot as UNKNOWN");
                    LookupOutcome::Failed
                }
            };
            CandidateCheck { usage, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use putaway_core::errors::OracleError;
    use std::time::{Duration, Instant};

    use crate::recommend::{Resilient, RetryPolicy};

    struct MapOracle;

    impl AvailabilityOracle for MapOracle {
        fn check(&self, slot_code: &str) -> Result<SlotStatus, OracleError> {
            match slot_code {
                "TN52D" => Ok(SlotStatus::Free),
                "TN53D" => Ok(SlotStatus::Occupied),
                "BROKEN" => Err(OracleError::LookupFailed {
                    slot: slot_code.into(),
                    message: "timeout".into(),
                }),
                _ => Ok(SlotStatus::Unknown),
            }
        }
    }

    fn usage(code: &str) -> LocationUsage {
        let now = Utc::now();
        LocationUsage {
            code: code.into(),
            count: 1,
            percentage: 25.0,
            first_used: now,
            last_used: now,
        }
    }

    #[test]
    fn test_order_preserved_and_failures_absorbed() {
        let slots: Vec<LocationUsage> = ["TN53D", "BROKEN", "TN52D", "ZZ99Z"]
            .iter()
            .map(|c| usage(c))
            .collect();
        let refs: Vec<&LocationUsage> = slots.iter().collect();
        let checks = check_candidates(&MapOracle, &refs, &CancellationToken::new());

        let codes: Vec<&str> = checks.iter().map(|c| c.usage.code.as_str()).collect();
        assert_eq!(codes, vec!["TN53D", "BROKEN", "TN52D", "ZZ99Z"]);
        assert_eq!(checks[0].outcome, LookupOutcome::Checked(SlotStatus::Occupied));
        assert_eq!(checks[1].outcome, LookupOutcome::Failed);
        assert_eq!(checks[1].outcome.status(), SlotStatus::Unknown);
        assert!(checks[2].is_free());
        assert!(!checks[3].is_free());
    }

    #[test]
    fn test_cancelled_token_skips_lookups() {
        let slots = [usage("TN52D")];
        let refs: Vec<&LocationUsage> = slots.iter().collect();
        let token = CancellationToken::new();
        token.cancel();
        let checks = check_candidates(&MapOracle, &refs, &token);
        assert_eq!(checks[0].outcome, LookupOutcome::Skipped);
        assert!(!checks[0].is_free());
    }

    struct Down;

    impl AvailabilityOracle for Down {
        fn check(&self, slot_code: &str) -> Result<SlotStatus, OracleError> {
            Err(OracleError::LookupFailed {
                slot: slot_code.into(),
                message: "connection refused".into(),
            })
        }
    }

    #[test]
    fn test_cancel_mid_retry_returns_promptly() {
        let oracle = Resilient::new(Down, RetryPolicy::new(3, Duration::from_millis(400), 1.0));
        let slots = [usage("TN52D"), usage("TN53D")];
        let refs: Vec<&LocationUsage> = slots.iter().collect();
        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                token.cancel();
            })
        };

        let started = Instant::now();
        let checks = check_candidates(&oracle, &refs, &token);
        let elapsed = started.elapsed();
        canceller.join().unwrap();

        assert!(elapsed < Duration::from_millis(300), "took {elapsed:?}");
        assert!(checks.iter().all(|c| c.outcome == LookupOutcome::Skipped));
    }
}
