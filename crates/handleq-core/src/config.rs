use std::time::Duration;

use crate::wire::ByteOrder;

/// Default slice a blocked caller sleeps on a session lock before re-checking
/// its interrupt token.
pub const DEFAULT_LOCK_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration applied to every session a registry attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Byte order of encoded elements on submit and drain.
    pub byte_order: ByteOrder,
    /// How long an interruptible lock wait blocks between interrupt checks.
    pub lock_poll_interval: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::default(),
            lock_poll_interval: DEFAULT_LOCK_POLL_INTERVAL,
        }
    }
}

impl QueueConfig {
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_lock_poll_interval(mut self, interval: Duration) -> Self {
        self.lock_poll_interval = interval;
        self
    }
}
