//! Retry-with-backoff applied at the collaborator boundary.
//!
//! `Resilient<T>` wraps a collaborator and implements the same trait, so
//! the engine never sees retries.

use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use putaway_core::config::ResilienceConfig;
use putaway_core::errors::{ExplanationError, OracleError, StorageError};
use putaway_core::traits::{AvailabilityOracle, CancellationToken, ExplanationGenerator, PatternStore};
use putaway_core::types::{ExplanationContext, PartPattern, SlotStatus};

/// Upper bound on a single backoff when none is configured.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// How often a cancellable backoff wakes to look at its token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Fixed attempt budget with exponential backoff between attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    /// No single delay exceeds this.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration, multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            multiplier: multiplier.max(1.0),
            max_backoff: DEFAULT_MAX_BACKOFF.max(initial_backoff),
        }
    }

    /// Single attempt, no sleeping.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, 1.0)
    }

    /// Delays are capped at the request timeout.
    pub fn from_config(config: &ResilienceConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff(),
            config.backoff_multiplier,
        )
        .with_max_backoff(config.request_timeout())
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff.max(self.initial_backoff);
        self
    }

    /// Delay before attempt `attempt + 1` (0-based `attempt`), saturating at
    /// `max_backoff`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        if self.initial_backoff.is_zero() {
            return Duration::ZERO;
        }
        let factor = self.multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        Duration::try_from_secs_f64(self.initial_backoff.as_secs_f64() * factor)
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }

    /// Run `op` until it succeeds or the budget is spent; returns the last error.
    pub fn run<T, E, F>(&self, what: &str, op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        self.run_until(what, None, op)
    }

    /// Like [`run`](Self::run), but stops retrying as soon as `token` is
    /// cancelled, including part way through a backoff. The error from the
    /// last completed attempt is returned.
    pub fn run_cancellable<T, E, F>(&self, what: &str, token: &CancellationToken, op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        self.run_until(what, Some(token), op)
    }

    fn run_until<T, E, F>(&self, what: &str, token: Option<&CancellationToken>, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 < self.max_attempts => {
                    let delay = self.backoff_for(attempt);
                    warn!(
                        what,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "collaborator call failed, retrying"
                    );
                    if !sleep_unless_cancelled(delay, token) {
                        debug!(what, attempt = attempt + 1, "cancelled, abandoning retries");
                        return Err(e);
                    }
                    attempt += 1;
                }
                Err(e) => {
                    error!(what, attempts = self.max_attempts, error = %e, "collaborator call failed");
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ResilienceConfig::default())
    }
}

/// Sleep for `delay`; false if `token` was cancelled before or during it.
fn sleep_unless_cancelled(delay: Duration, token: Option<&CancellationToken>) -> bool {
    let Some(token) = token else {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        return true;
    };
    let started = Instant::now();
    loop {
        if token.is_cancelled() {
            return false;
        }
        let elapsed = started.elapsed();
        if elapsed >= delay {
            return true;
        }
        std::thread::sleep((delay - elapsed).min(CANCEL_POLL_INTERVAL));
    }
}

/// A collaborator wrapped in a retry policy.
#[derive(Debug, Clone)]
pub struct Resilient<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> Resilient<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<T: PatternStore> PatternStore for Resilient<T> {
    fn get(&self, part_id: i64) -> Result<Option<Arc<PartPattern>>, StorageError> {
        self.policy.run("pattern_store.get", || self.inner.get(part_id))
    }

    fn put_batch(&self, records: Vec<PartPattern>) -> Result<usize, StorageError> {
        // replace is atomic, so a failed attempt leaves the old set in place
        self.policy
            .run("pattern_store.put_batch", || self.inner.put_batch(records.clone()))
    }
}

impl<T: AvailabilityOracle> AvailabilityOracle for Resilient<T> {
    fn check(&self, slot_code: &str) -> Result<SlotStatus, OracleError> {
        self.policy
            .run("availability.check", || self.inner.check(slot_code))
    }

    fn check_with_cancellation(
        &self,
        slot_code: &str,
        token: &CancellationToken,
    ) -> Result<SlotStatus, OracleError> {
        self.policy.run_cancellable("availability.check", token, || {
            self.inner.check_with_cancellation(slot_code, token)
        })
    }
}

impl<T: ExplanationGenerator> ExplanationGenerator for Resilient<T> {
    fn explain(&self, context: &ExplanationContext) -> Result<String, ExplanationError> {
        self.policy.run("explainer.explain", || self.inner.explain(context))
    }
}
