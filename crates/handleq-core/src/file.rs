//! In-process file-like handle over one session.
//!
//! [`QueueFile`] gives a client the same shape a file-backed transport would:
//! `write` submits, `read` drains into the caller's buffer, and dropping the
//! handle detaches the session. Errors surface as `io::Error` carrying the
//! POSIX error number from [`QueueError::errno`].

use std::io;
use std::sync::Arc;

use crate::error::QueueError;
use crate::interrupt::Interrupt;
use crate::registry::{SessionHandle, SessionRegistry};
use crate::session::SessionStatus;
use crate::wire;

pub struct QueueFile {
    registry: Arc<SessionRegistry>,
    handle: SessionHandle,
    interrupt: Interrupt,
}

impl QueueFile {
    pub(crate) fn new(registry: Arc<SessionRegistry>, handle: SessionHandle) -> Self {
        Self {
            registry,
            handle,
            interrupt: Interrupt::new(),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle
    }

    /// Token that cancels this handle's blocked reads and writes.
    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    /// Set the queue capacity.
    pub fn set_capacity(&self, capacity: i8) -> Result<(), QueueError> {
        self.registry
            .submit_interruptible(self.handle, &[capacity as u8], &self.interrupt)
            .map(|_| ())
    }

    /// Enqueue one value in the registry's configured byte order.
    pub fn push(&self, value: i32) -> Result<(), QueueError> {
        let payload = self.registry.config().byte_order.encode(value);
        self.registry
            .submit_interruptible(self.handle, &payload, &self.interrupt)
            .map(|_| ())
    }

    /// Drain the queue into decoded values; empty at end of data.
    pub fn drain_values(&self, max_bytes: usize) -> Result<Vec<i32>, QueueError> {
        let order = self.registry.config().byte_order;
        let bytes = self
            .registry
            .drain_interruptible(self.handle, max_bytes, &self.interrupt)?;
        bytes
            .chunks_exact(wire::ELEMENT_WIRE_SIZE)
            .map(|chunk| wire::element(chunk, order))
            .collect()
    }

    pub fn status(&self) -> Result<SessionStatus, QueueError> {
        Ok(self.registry.lookup(self.handle)?.status())
    }
}

impl io::Write for QueueFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self
            .registry
            .submit_interruptible(self.handle, buf, &self.interrupt)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for QueueFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes = self
            .registry
            .drain_interruptible(self.handle, buf.len(), &self.interrupt)?;
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

impl Drop for QueueFile {
    fn drop(&mut self) {
        // Only fails if the session was already detached through the registry.
        let _ = self.registry.detach(self.handle);
    }
}

impl std::fmt::Debug for QueueFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueFile")
            .field("handle", &self.handle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use super::*;

    #[test]
    fn write_and_read_like_a_file() {
        let registry = Arc::new(SessionRegistry::new());
        let mut file = registry.open();

        assert_eq!(file.write(&[3]).unwrap(), 1);
        assert_eq!(file.write(&7i32.to_le_bytes()).unwrap(), 4);

        let mut buf = [0u8; 16];
        assert_eq!(file.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &7i32.to_le_bytes());
        assert_eq!(file.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn errors_carry_errno() {
        let registry = Arc::new(SessionRegistry::new());
        let mut file = registry.open();

        let err = file.write(&[0]).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));

        let mut buf = [0u8; 4];
        let err = file.read(&mut buf).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EACCES));
    }

    #[test]
    fn drop_detaches() {
        let registry = Arc::new(SessionRegistry::new());
        let file = registry.open();
        let handle = file.handle();
        assert_eq!(registry.len(), 1);

        drop(file);
        assert!(registry.is_empty());
        assert_eq!(
            registry.lookup(handle).unwrap_err(),
            QueueError::UnknownSession(handle)
        );
    }

    #[test]
    fn typed_helpers() {
        let registry = Arc::new(SessionRegistry::new());
        let file = registry.open();
        file.set_capacity(2).unwrap();
        file.push(-1).unwrap();
        file.push(i32::MAX).unwrap();
        assert_eq!(
            file.push(0).unwrap_err(),
            QueueError::AccessDenied(crate::DenyReason::QueueFull)
        );
        assert_eq!(file.drain_values(8).unwrap(), vec![-1, i32::MAX]);
        assert_eq!(file.drain_values(8).unwrap(), Vec::<i32>::new());
    }
}
