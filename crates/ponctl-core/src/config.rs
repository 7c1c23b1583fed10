// ── Runtime dispatch configuration ──
//
// Tuning for the dispatcher: timeouts, retry and concurrency. Built by the
// CLI from the config file; core never reads files for this.

use std::time::Duration;

/// Retry behaviour on one transport before failing over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first, for transient failures only.
    pub retries: u32,
    /// Fixed pause before each retry.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Total attempts allowed per transport.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    pub fn none() -> Self {
        Self {
            retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Dispatcher tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Bound on each backend attempt (each PDU for walks).
    pub attempt_timeout: Duration,
    pub retry: RetryPolicy,
    /// Operations executing at once across all elements.
    pub max_in_flight: usize,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(5),
            retry: RetryPolicy::default(),
            max_in_flight: 32,
        }
    }
}
