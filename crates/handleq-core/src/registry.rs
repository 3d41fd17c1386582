//! Session registry: maps client handles to their queues.
//!
//! The registry is the only structure shared across sessions. Its map sits
//! behind its own reader-writer lock, separate from every session's lock.
//! Lookups clone the session's `Arc` and release the map lock before the
//! session is touched, so a slow submit on one session never holds up
//! attach, detach or lookups for another.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::file::QueueFile;
use crate::interrupt::Interrupt;
use crate::session::SessionQueue;

/// Opaque identifier of an attached session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionHandle(u64);

impl SessionHandle {
    /// Rebuild a handle from a value previously obtained with [`as_raw`](Self::as_raw).
    pub const fn from_raw(raw: u64) -> Self {
        SessionHandle(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owns every attached session.
pub struct SessionRegistry {
    config: QueueConfig,
    next_handle: AtomicU64,
    sessions: RwLock<HashMap<SessionHandle, Arc<SessionQueue>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            config,
            next_handle: AtomicU64::new(1),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Create a fresh, uninitialized session.
    pub fn attach(&self) -> SessionHandle {
        let handle = SessionHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(SessionQueue::new(handle, self.config));
        self.sessions.write().insert(handle, session);
        tracing::info!(session = %handle, "session attached");
        handle
    }

    /// Remove a session, releasing its queue once no call is still using it.
    pub fn detach(&self, handle: SessionHandle) -> Result<(), QueueError> {
        match self.sessions.write().remove(&handle) {
            Some(_) => {
                tracing::info!(session = %handle, "session detached");
                Ok(())
            }
            None => {
                tracing::warn!(session = %handle, "detach of unknown session");
                Err(QueueError::UnknownSession(handle))
            }
        }
    }

    pub fn lookup(&self, handle: SessionHandle) -> Result<Arc<SessionQueue>, QueueError> {
        self.sessions
            .read()
            .get(&handle)
            .cloned()
            .ok_or(QueueError::UnknownSession(handle))
    }

    pub fn submit(&self, handle: SessionHandle, payload: &[u8]) -> Result<usize, QueueError> {
        self.lookup(handle)?.submit(payload)
    }

    pub fn submit_interruptible(
        &self,
        handle: SessionHandle,
        payload: &[u8],
        interrupt: &Interrupt,
    ) -> Result<usize, QueueError> {
        self.lookup(handle)?.submit_interruptible(payload, interrupt)
    }

    pub fn drain(&self, handle: SessionHandle, max_bytes: usize) -> Result<Bytes, QueueError> {
        self.lookup(handle)?.drain(max_bytes)
    }

    pub fn drain_interruptible(
        &self,
        handle: SessionHandle,
        max_bytes: usize,
        interrupt: &Interrupt,
    ) -> Result<Bytes, QueueError> {
        self.lookup(handle)?.drain_interruptible(max_bytes, interrupt)
    }

    /// Attach a session wrapped in a handle that detaches when dropped.
    pub fn open(self: &Arc<Self>) -> QueueFile {
        let handle = self.attach();
        QueueFile::new(Arc::clone(self), handle)
    }

    /// Number of attached sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("config", &self.config)
            .field("sessions", &self.len())
            .finish()
    }
}
