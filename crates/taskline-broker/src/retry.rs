//! Startup connection retry policy

use std::time::Duration;

/// Bounded fixed-interval retry for the startup connection loop.
///
/// There is no backoff: the broker is expected to come up within a few
/// container restarts, so attempts are evenly spaced. Once the budget is
/// exhausted the manager gives up for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRetryPolicy {
    /// Maximum number of connection attempts (including the first)
    pub max_attempts: u32,

    /// Delay between attempts
    pub delay: Duration,
}

impl Default for ConnectRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(3000),
        }
    }
}

impl ConnectRetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Check if there are remaining attempts after `current_attempt` (1-based)
    pub fn has_attempts_remaining(&self, current_attempt: u32) -> bool {
        current_attempt < self.max_attempts
    }
}
