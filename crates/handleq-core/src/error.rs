//! Error taxonomy shared by every queue operation.

use std::io;

use thiserror::Error;

use handleq_ring::{AllocError, RingEmpty, RingFull};

use crate::registry::SessionHandle;

/// Why an operation was refused with [`QueueError::AccessDenied`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Enqueue into a queue with no free slot.
    QueueFull,
    /// Drain from a queue holding no elements.
    QueueEmpty,
    /// Drain before a capacity has been set.
    Uninitialized,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::QueueFull => write!(f, "queue is full"),
            DenyReason::QueueEmpty => write!(f, "queue is empty"),
            DenyReason::Uninitialized => write!(f, "queue capacity not set"),
        }
    }
}

/// Errors reported by sessions and the registry.
///
/// Every error is local to the call that produced it: the session is left in
/// the state it had before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Payload length does not match what the current phase expects.
    #[error("invalid payload size: expected {expected} bytes, got {actual}")]
    InvalidArgumentSize { expected: usize, actual: usize },

    /// Capacity byte outside `[1, 100]`.
    #[error("invalid capacity {0}: must be between 1 and 100")]
    InvalidCapacity(i64),

    /// Queue storage could not be allocated.
    #[error("resource exhausted: could not allocate queue storage")]
    ResourceExhausted,

    /// Operation not permitted in the queue's current state.
    #[error("access denied: {0}")]
    AccessDenied(DenyReason),

    /// Handle is not currently attached.
    #[error("unknown session {0}")]
    UnknownSession(SessionHandle),

    /// Lock wait was cancelled before the operation started.
    #[error("interrupted while waiting for session lock")]
    Interrupted,
}

/// Fieldless discriminant of [`QueueError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgumentSize,
    InvalidCapacity,
    ResourceExhausted,
    AccessDenied,
    UnknownSession,
    Interrupted,
}

impl QueueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueueError::InvalidArgumentSize { .. } => ErrorKind::InvalidArgumentSize,
            QueueError::InvalidCapacity(_) => ErrorKind::InvalidCapacity,
            QueueError::ResourceExhausted => ErrorKind::ResourceExhausted,
            QueueError::AccessDenied(_) => ErrorKind::AccessDenied,
            QueueError::UnknownSession(_) => ErrorKind::UnknownSession,
            QueueError::Interrupted => ErrorKind::Interrupted,
        }
    }

    /// POSIX error number a file-backed transport reports for this error.
    pub fn errno(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidArgumentSize | ErrorKind::InvalidCapacity => libc::EINVAL,
            ErrorKind::ResourceExhausted => libc::ENOMEM,
            ErrorKind::AccessDenied => libc::EACCES,
            ErrorKind::UnknownSession => libc::EBADF,
            ErrorKind::Interrupted => libc::EINTR,
        }
    }
}

impl From<RingFull> for QueueError {
    fn from(_: RingFull) -> Self {
        QueueError::AccessDenied(DenyReason::QueueFull)
    }
}

impl From<RingEmpty> for QueueError {
    fn from(_: RingEmpty) -> Self {
        QueueError::AccessDenied(DenyReason::QueueEmpty)
    }
}

impl From<AllocError> for QueueError {
    fn from(_: AllocError) -> Self {
        QueueError::ResourceExhausted
    }
}

impl From<QueueError> for io::Error {
    fn from(err: QueueError) -> Self {
        io::Error::from_raw_os_error(err.errno())
    }
}
