//! Bounded retry with exponential backoff
//!
//! Install actions run under a caller-supplied `RetryPolicy`. The delay
//! doubles after every failed attempt, with no jitter and no cap; a run
//! of N attempts sleeps `initial_delay * (2^(N-1) - 1)` in total. Sleeps
//! are taken in short slices so a tripped `CancelToken` aborts promptly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{Result, RigupError};

/// How many times to try an install action and how long to wait between
/// tries. The backoff multiplier is fixed at 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Sleep taken before attempt `attempt` (1-based). The first attempt
    /// runs immediately; attempt n waits `initial_delay * 2^(n-2)`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let multiplier = 2u32.saturating_pow(attempt - 2);
        self.initial_delay.saturating_mul(multiplier)
    }
}

/// Cloneable cancellation flag shared between the orchestrator and
/// whoever wants to abort it (e.g. a Ctrl-C handler).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Run `action` until it succeeds or the policy is exhausted.
///
/// Non-final failures are logged at WARN and retried after the backoff
/// sleep. The final failure is wrapped in `InstallActionFailed` with the
/// attempt count. Cancellation observed before an attempt or mid-sleep
/// yields `Cancelled`.
pub fn with_retry<T, F>(
    label: &str,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    action: F,
) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    with_retry_using(label, policy, cancel, action, sleep_interruptible)
}

fn with_retry_using<T, F, S>(
    label: &str,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut action: F,
    mut sleep: S,
) -> Result<T>
where
    F: FnMut() -> Result<T>,
    S: FnMut(Duration, &CancelToken) -> bool,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        if cancel.is_cancelled() {
            return Err(RigupError::Cancelled {
                label: label.to_string(),
            });
        }
        match action() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts => {
                let delay = policy.delay_before(attempt + 1);
                tracing::warn!(
                    "{label}: attempt {attempt} of {} failed: {err}; retrying in {delay:?}",
                    policy.max_attempts
                );
                if !sleep(delay, cancel) {
                    return Err(RigupError::Cancelled {
                        label: label.to_string(),
                    });
                }
            }
            Err(err) => {
                return Err(RigupError::InstallActionFailed {
                    tool: label.to_string(),
                    attempts: attempt,
                    reason: err.to_string(),
                });
            }
        }
    }
}

const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Sleep in slices, returning false if the token trips mid-sleep.
fn sleep_interruptible(total: Duration, cancel: &CancelToken) -> bool {
    let mut remaining = total;
    while remaining > Duration::ZERO {
        if cancel.is_cancelled() {
            return false;
        }
        let slice = remaining.min(SLEEP_SLICE);
        std::thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
    true
}
