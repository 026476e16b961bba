//! Reconnection policy for the Redis client.
//!
//! The client calls [`ReconnectPolicy::decide`] after every failed
//! connection attempt. The policy holds no state between calls; everything
//! it needs arrives in the [`ReconnectContext`].

use std::io;
use std::time::Duration;

use tracing::debug;

use crate::error::ReconnectError;

/// What the client knows when asking whether to retry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconnectContext {
    /// Kind of the error that ended the last attempt, if any.
    pub error: Option<io::ErrorKind>,
    /// 1-based attempt counter since the last successful connection.
    pub attempt: u32,
    /// Time spent retrying since the first failure.
    pub total_retry_time: Duration,
    /// How many times a connection has been established so far.
    pub times_connected: u32,
}

impl ReconnectContext {
    pub fn from_io_error(
        err: &io::Error,
        attempt: u32,
        total_retry_time: Duration,
        times_connected: u32,
    ) -> Self {
        Self {
            error: Some(err.kind()),
            attempt,
            total_retry_time,
            times_connected,
        }
    }
}

/// Outcome of a [`ReconnectPolicy::decide`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Stop for good and flush pending commands with this error.
    Stop(ReconnectError),
    /// Stop and let the client fail pending commands with its own error.
    ClientDefault,
    /// Wait this long, then reconnect.
    RetryAfter(Duration),
}

impl ReconnectDecision {
    /// Delay in milliseconds, if this decision is a retry.
    pub fn delay_ms(&self) -> Option<u64> {
        match self {
            ReconnectDecision::RetryAfter(d) => Some(u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            _ => None,
        }
    }

    pub fn is_retry(&self) -> bool {
        matches!(self, ReconnectDecision::RetryAfter(_))
    }
}

/// Linear backoff with a floor, bounded by total retry time and by the
/// number of times the link has come up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Give up once cumulative retry time exceeds this.
    pub max_retry_time: Duration,
    /// Give up once the connection has been established more often than this.
    pub max_times_connected: u32,
    /// Delay added per attempt.
    pub step: Duration,
    /// Minimum delay between attempts.
    pub min_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retry_time: Duration::from_secs(60 * 60),
            max_times_connected: 10,
            step: Duration::from_millis(100),
            min_delay: Duration::from_millis(3000),
        }
    }
}

impl ReconnectPolicy {
    pub fn decide(&self, ctx: &ReconnectContext) -> ReconnectDecision {
        // A refusal means nothing is listening at the configured address.
        if ctx.error == Some(io::ErrorKind::ConnectionRefused) {
            debug!(attempt = ctx.attempt, "redis refused the connection, giving up");
            return ReconnectDecision::Stop(ReconnectError::ConnectionRefused);
        }

        if ctx.total_retry_time > self.max_retry_time {
            debug!(
                total_retry_ms = u64::try_from(ctx.total_retry_time.as_millis()).unwrap_or(u64::MAX),
                "redis retry time exhausted, giving up"
            );
            return ReconnectDecision::Stop(ReconnectError::RetryTimeExhausted);
        }

        if ctx.times_connected > self.max_times_connected {
            debug!(times_connected = ctx.times_connected, "redis link flapping, giving up");
            return ReconnectDecision::ClientDefault;
        }

        let delay = self.step.saturating_mul(ctx.attempt).max(self.min_delay);
        ReconnectDecision::RetryAfter(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(attempt: u32, total_retry_ms: u64, times_connected: u32) -> ReconnectContext {
        ReconnectContext {
            error: Some(io::ErrorKind::TimedOut),
            attempt,
            total_retry_time: Duration::from_millis(total_retry_ms),
            times_connected,
        }
    }

    #[test]
    fn refused_always_stops() {
        let policy = ReconnectPolicy::default();
        for (attempt, total, times) in [(1, 0, 0), (50, 10, 3), (1, 9_000_000, 99)] {
            let mut c = ctx(attempt, total, times);
            c.error = Some(io::ErrorKind::ConnectionRefused);
            assert_eq!(
                policy.decide(&c),
                ReconnectDecision::Stop(ReconnectError::ConnectionRefused)
            );
        }
    }

    #[test]
    fn retry_time_ceiling_stops() {
        let policy = ReconnectPolicy::default();
        assert_eq!(
            policy.decide(&ctx(5, 3_600_001, 0)),
            ReconnectDecision::Stop(ReconnectError::RetryTimeExhausted)
        );
        // exactly at the ceiling still retries
        assert!(policy.decide(&ctx(5, 3_600_000, 0)).is_retry());
    }

    #[test]
    fn flapping_link_hands_back_to_client() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.decide(&ctx(1, 10, 11)), ReconnectDecision::ClientDefault);
        assert!(policy.decide(&ctx(1, 10, 10)).is_retry());
    }

    #[test]
    fn early_attempts_use_floor() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.decide(&ctx(1, 10, 0)).delay_ms(), Some(3000));
        assert_eq!(policy.decide(&ctx(30, 10, 0)).delay_ms(), Some(3000));
    }

    #[test]
    fn later_attempts_grow_linearly() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.decide(&ctx(31, 10, 0)).delay_ms(), Some(3100));
        assert_eq!(policy.decide(&ctx(50, 10, 0)).delay_ms(), Some(5000));
    }

    #[test]
    fn no_error_kind_still_backs_off() {
        let policy = ReconnectPolicy::default();
        let c = ReconnectContext { attempt: 2, ..Default::default() };
        assert_eq!(policy.decide(&c).delay_ms(), Some(3000));
    }

    #[test]
    fn huge_attempt_does_not_overflow() {
        let policy = ReconnectPolicy::default();
        assert!(policy.decide(&ctx(u32::MAX, 0, 0)).is_retry());
    }

    #[test]
    fn context_from_io_error() {
        let err = io::Error::new(io::ErrorKind::ConnectionRefused, "nope");
        let c = ReconnectContext::from_io_error(&err, 3, Duration::from_secs(1), 2);
        assert_eq!(c.error, Some(io::ErrorKind::ConnectionRefused));
        assert_eq!(c.attempt, 3);
        assert!(matches!(
            ReconnectPolicy::default().decide(&c),
            ReconnectDecision::Stop(ReconnectError::ConnectionRefused)
        ));
    }

    #[test]
    fn policy_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + Copy>() {}
        assert_send_sync::<ReconnectPolicy>();
    }
}
