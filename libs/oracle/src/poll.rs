//! Bounded polling.
//!
//! Every wait in the harness goes through [`eventually`]: a predicate, a
//! deadline and a poll interval. The predicate is re-evaluated until it
//! yields a value or the deadline passes; there is no unbounded wait.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::error::PollError;

/// Default deadline for an assertion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default interval between polls.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay after the first failed attempt.
    pub initial: Duration,

    /// Upper bound on any single delay.
    pub max: Duration,

    /// Multiplier applied after each attempt (1 = fixed interval).
    pub factor: u32,
}

impl Backoff {
    /// Constant interval.
    pub const fn fixed(interval: Duration) -> Self {
        Self {
            initial: interval,
            max: interval,
            factor: 1,
        }
    }

    /// Doubling interval capped at `max`.
    pub const fn exponential(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            factor: 2,
        }
    }

    /// Delay to wait after `attempt` (0-based) failed.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = self.factor.max(1);
        let multiplier = factor.saturating_pow(attempt);
        self.initial.saturating_mul(multiplier).min(self.max)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::fixed(DEFAULT_INTERVAL)
    }
}

/// Deadline plus delay schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub timeout: Duration,
    pub backoff: Backoff,
}

impl PollPolicy {
    pub const fn new(timeout: Duration, backoff: Backoff) -> Self {
        Self { timeout, backoff }
    }

    /// Same schedule, different deadline.
    pub const fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout,
            backoff: self.backoff,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, Backoff::default())
    }
}

/// Re-evaluate `check` until it yields `Some`, or fail once `policy.timeout`
/// has elapsed.
///
/// The check always runs at least once, and once more at the deadline, so a
/// condition that becomes true during the final sleep is still observed.
pub async fn eventually<T, F, Fut>(what: &str, policy: PollPolicy, mut check: F) -> Result<T, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = Instant::now();
    let deadline = start + policy.timeout;
    let mut attempt = 0u32;

    loop {
        if let Some(value) = check().await {
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(PollError::Timeout {
                what: what.to_string(),
                elapsed: now - start,
            });
        }

        let delay = policy.backoff.delay(attempt).min(deadline - now);
        trace!(what, attempt, ?delay, "condition not met yet");
        tokio::time::sleep(delay).await;
        attempt = attempt.saturating_add(1);
    }
}
