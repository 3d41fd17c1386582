//! Per-session queue and its two-phase transfer protocol.
//!
//! A session starts `Uninitialized`. The first successful write carries a
//! single capacity byte and moves it to `Ready`, which it never leaves; every
//! later write carries exactly one encoded element. A read drains the whole
//! queue at once.
//!
//! # Stream position
//!
//! Reads behave like reading a file to end-of-data: after a drain returns
//! data, further drains return an empty buffer (not an error) until another
//! element is enqueued. A drain of an empty queue that has not just been
//! drained is refused with `AccessDenied`.
//!
//! # Locking
//!
//! Each session owns one mutex guarding its phase and ring. Every submit and
//! drain holds it for the whole call, so callers never observe a half-applied
//! operation. Interruptible variants give up with `Interrupted` instead of
//! waiting indefinitely.

use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};

use handleq_ring::{BoundedRing, Capacity};

use crate::config::QueueConfig;
use crate::error::{DenyReason, QueueError};
use crate::interrupt::Interrupt;
use crate::registry::SessionHandle;
use crate::wire::{self, CAPACITY_WIRE_SIZE, ELEMENT_WIRE_SIZE};

enum Phase {
    Uninitialized,
    Ready(ReadyQueue),
}

struct ReadyQueue {
    ring: BoundedRing<i32>,
    /// Set by a successful drain, cleared by the next enqueue.
    exhausted: bool,
}

/// Snapshot of a session's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Uninitialized,
    Ready {
        capacity: usize,
        len: usize,
        /// A drain right now would return end-of-data.
        exhausted: bool,
    },
}

/// One client's queue.
pub struct SessionQueue {
    handle: SessionHandle,
    config: QueueConfig,
    phase: Mutex<Phase>,
}

impl SessionQueue {
    pub(crate) fn new(handle: SessionHandle, config: QueueConfig) -> Self {
        Self {
            handle,
            config,
            phase: Mutex::new(Phase::Uninitialized),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Set the capacity (first call) or enqueue one element (every later call).
    ///
    /// Returns the number of payload bytes consumed.
    pub fn submit(&self, payload: &[u8]) -> Result<usize, QueueError> {
        let mut phase = self.phase.lock();
        self.submit_locked(&mut phase, payload)
    }

    /// [`submit`](Self::submit), giving up with `Interrupted` if `interrupt`
    /// is raised while waiting for the session lock.
    pub fn submit_interruptible(
        &self,
        payload: &[u8],
        interrupt: &Interrupt,
    ) -> Result<usize, QueueError> {
        let mut phase = self.lock_interruptible(interrupt)?;
        self.submit_locked(&mut phase, payload)
    }

    /// Drain every queued element, oldest first.
    ///
    /// `max_bytes` is the size of the caller's buffer; it must hold the whole
    /// queue or the call fails with `InvalidArgumentSize` and nothing is
    /// drained.
    pub fn drain(&self, max_bytes: usize) -> Result<Bytes, QueueError> {
        let mut phase = self.phase.lock();
        self.drain_locked(&mut phase, max_bytes)
    }

    /// [`drain`](Self::drain), giving up with `Interrupted` if `interrupt` is
    /// raised while waiting for the session lock.
    pub fn drain_interruptible(
        &self,
        max_bytes: usize,
        interrupt: &Interrupt,
    ) -> Result<Bytes, QueueError> {
        let mut phase = self.lock_interruptible(interrupt)?;
        self.drain_locked(&mut phase, max_bytes)
    }

    pub fn status(&self) -> SessionStatus {
        match &*self.phase.lock() {
            Phase::Uninitialized => SessionStatus::Uninitialized,
            Phase::Ready(ready) => SessionStatus::Ready {
                capacity: ready.ring.capacity(),
                len: ready.ring.len(),
                exhausted: ready.exhausted,
            },
        }
    }

    fn lock_interruptible(
        &self,
        interrupt: &Interrupt,
    ) -> Result<MutexGuard<'_, Phase>, QueueError> {
        if let Some(guard) = self.phase.try_lock() {
            return Ok(guard);
        }

        loop {
            if interrupt.is_raised() {
                tracing::debug!(session = %self.handle, "lock wait interrupted");
                return Err(QueueError::Interrupted);
            }
            if let Some(guard) = self.phase.try_lock_for(self.config.lock_poll_interval) {
                return Ok(guard);
            }
        }
    }

    fn submit_locked(&self, phase: &mut Phase, payload: &[u8]) -> Result<usize, QueueError> {
        let ready = match phase {
            Phase::Ready(ready) => ready,
            Phase::Uninitialized => {
                let ring = self.allocate(payload)?;
                *phase = Phase::Ready(ReadyQueue {
                    ring,
                    exhausted: false,
                });
                return Ok(CAPACITY_WIRE_SIZE);
            }
        };

        let value = wire::element(payload, self.config.byte_order).inspect_err(|_| {
            tracing::warn!(
                session = %self.handle,
                len = payload.len(),
                "enqueue rejected: payload must be {ELEMENT_WIRE_SIZE} bytes"
            );
        })?;

        if let Err(full) = ready.ring.enqueue(value) {
            tracing::debug!(
                session = %self.handle,
                capacity = ready.ring.capacity(),
                "enqueue rejected: queue full"
            );
            return Err(full.into());
        }
        ready.exhausted = false;
        tracing::trace!(session = %self.handle, value, len = ready.ring.len(), "enqueued");

        Ok(ELEMENT_WIRE_SIZE)
    }

    fn allocate(&self, payload: &[u8]) -> Result<BoundedRing<i32>, QueueError> {
        let raw = wire::capacity_byte(payload).inspect_err(|_| {
            tracing::warn!(
                session = %self.handle,
                len = payload.len(),
                "initialization rejected: payload must be {CAPACITY_WIRE_SIZE} byte"
            );
        })?;

        let Some(capacity) = Capacity::from_wire(raw) else {
            tracing::warn!(session = %self.handle, capacity = raw, "invalid capacity");
            return Err(QueueError::InvalidCapacity(raw as i64));
        };

        let ring = BoundedRing::new(capacity).inspect_err(|_| {
            tracing::error!(session = %self.handle, %capacity, "queue allocation failed");
        })?;
        tracing::info!(session = %self.handle, %capacity, "queue initialized");

        Ok(ring)
    }

    fn drain_locked(&self, phase: &mut Phase, max_bytes: usize) -> Result<Bytes, QueueError> {
        let Phase::Ready(ready) = phase else {
            tracing::debug!(session = %self.handle, "drain before initialization");
            return Err(QueueError::AccessDenied(DenyReason::Uninitialized));
        };

        if ready.exhausted {
            tracing::debug!(session = %self.handle, "drain at end of data");
            return Ok(Bytes::new());
        }

        if ready.ring.is_empty() {
            tracing::debug!(session = %self.handle, "queue is empty, nothing to drain");
            return Err(QueueError::AccessDenied(DenyReason::QueueEmpty));
        }

        let needed = ready.ring.len() * ELEMENT_WIRE_SIZE;
        if max_bytes < needed {
            return Err(QueueError::InvalidArgumentSize {
                expected: needed,
                actual: max_bytes,
            });
        }

        let values = ready.ring.drain_all()?;
        ready.exhausted = true;
        tracing::debug!(session = %self.handle, count = values.len(), "drained queue");

        Ok(wire::encode_elements(&values, self.config.byte_order).freeze())
    }
}

impl std::fmt::Debug for SessionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionQueue")
            .field("handle", &self.handle)
            .field("status", &self.status())
            .finish()
    }
}
