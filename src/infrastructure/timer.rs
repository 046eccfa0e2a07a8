use crate::types::{MAX_RECONNECT_ATTEMPTS, RECONNECT_STEP};
use std::time::Duration;

/// Reconnect schedule with linear backoff and a hard attempt cap
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    attempts: u32,
    max_attempts: u32,
    step: Duration,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, step: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            step,
        }
    }

    /// Delay before the given (1-based) attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        self.step * attempt
    }

    /// Claims the next attempt and returns its delay, or `None` once the cap is reached
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.delay(self.attempts))
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Reset after a successful connect or an explicit restart
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(
            MAX_RECONNECT_ATTEMPTS,
            Duration::from_millis(RECONNECT_STEP),
        )
    }
}
