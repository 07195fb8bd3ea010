//! Reconnection decisions for the client runner.

use std::time::Duration;

use crate::error::ClientError;

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RECONNECT_ATTEMPTS,
            interval: RECONNECT_INTERVAL,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the next attempt, or `None` to give up.
    ///
    /// `failures` counts consecutive failed attempts, including the one that
    /// produced `error`.
    pub fn next_delay(&self, error: &ClientError, failures: u32) -> Option<Duration> {
        match error {
            // Retrying a refused handshake gets the same answer
            ClientError::Rejected(_) => None,
            _ if failures >= self.max_attempts => None,
            _ => Some(self.interval),
        }
    }
}
