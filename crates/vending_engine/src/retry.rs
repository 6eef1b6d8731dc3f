use std::time::Duration;

/// Decides how long the poller waits before its next fetch.
pub trait RetryPolicy: Send + Sync {
    /// `consecutive_failures` is 0 right after a successful fetch.
    fn next_delay(&self, consecutive_failures: u32) -> Duration;
}

/// Same delay after every fetch, successful or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval(pub Duration);

impl Default for FixedInterval {
    fn default() -> Self {
        Self(Duration::from_secs(10))
    }
}

impl RetryPolicy for FixedInterval {
    fn next_delay(&self, _consecutive_failures: u32) -> Duration {
        self.0
    }
}

/// Doubles the delay per consecutive failure, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    pub interval: Duration,
    pub max: Duration,
}

impl RetryPolicy for ExponentialBackoff {
    fn next_delay(&self, consecutive_failures: u32) -> Duration {
        let factor = 1u32.checked_shl(consecutive_failures).unwrap_or(u32::MAX);
        self.interval
            .checked_mul(factor)
            .unwrap_or(self.max)
            .min(self.max)
    }
}
