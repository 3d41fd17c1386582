//! Cancellation of blocked lock waits.
//!
//! An [`Interrupt`] is shared between the thread waiting on a session lock and
//! whoever wants to cancel that wait (a signal handler bridge, a connection
//! teardown path, a shutdown hook). Raising it makes the waiter give up with
//! [`QueueError::Interrupted`](crate::QueueError::Interrupted) before it has
//! touched any session state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every current and future wait observing this token.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Re-arm the token after an interrupted call has been handled.
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = Interrupt::new();
        let b = a.clone();
        assert!(!b.is_raised());
        a.raise();
        assert!(b.is_raised());
        b.clear();
        assert!(!a.is_raised());
    }
}
