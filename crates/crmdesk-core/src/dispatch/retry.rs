//! Retry policy for transient transport failures.

use std::time::Duration;

use crate::{Error, Result};

/// Bounded exponential backoff with a per-attempt timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
    attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `max_attempts` is zero or a timeout of
    /// zero is given.
    pub fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        attempt_timeout: Option<Duration>,
    ) -> Result<Self> {
        if max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }
        if attempt_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::Config("attempt timeout must be positive".into()));
        }
        Ok(Self {
            max_attempts,
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
            attempt_timeout,
        })
    }

    /// One attempt, no retries, no timeout.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            attempt_timeout: None,
        }
    }

    /// Total attempts including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Time limit for a single attempt.
    #[must_use]
    pub const fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }

    /// Delay before retrying after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1 << exponent)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
            attempt_timeout: Some(Duration::from_secs(30)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
        assert_eq!(policy.backoff(5), Duration::from_secs(5));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO, None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = RetryPolicy::new(1, Duration::ZERO, Duration::ZERO, Some(Duration::ZERO));
        assert!(result.is_err());
    }

    #[test]
    fn test_max_backoff_never_below_initial() {
        let policy =
            RetryPolicy::new(2, Duration::from_secs(3), Duration::from_secs(1), None).unwrap();
        assert_eq!(policy.backoff(1), Duration::from_secs(3));
    }
}
