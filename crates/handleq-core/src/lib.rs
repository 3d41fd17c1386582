//! Per-session bounded integer queues.
//!
//! Every client that attaches gets its own isolated queue. The first write
//! sets the queue's capacity (one signed byte, 1 to 100); each later write
//! enqueues one 4-byte integer; a read drains the whole queue oldest-first
//! and resets it.
//!
//! A transport (a proc file, a socket server, an in-process handle) maps its
//! open/write/read/close events onto [`SessionRegistry::attach`],
//! [`SessionRegistry::submit`], [`SessionRegistry::drain`] and
//! [`SessionRegistry::detach`], and reports [`QueueError`]s in its own
//! convention ([`QueueError::errno`] gives the POSIX mapping).
//!
//! ```
//! use handleq_core::SessionRegistry;
//!
//! let registry = SessionRegistry::new();
//! let handle = registry.attach();
//! registry.submit(handle, &[5]).unwrap();
//! registry.submit(handle, &10i32.to_le_bytes()).unwrap();
//! registry.submit(handle, &20i32.to_le_bytes()).unwrap();
//!
//! let drained = registry.drain(handle, 64).unwrap();
//! assert_eq!(&drained[..], &[10, 0, 0, 0, 20, 0, 0, 0]);
//! registry.detach(handle).unwrap();
//! ```

mod config;
mod error;
mod file;
mod interrupt;
mod registry;
mod session;
pub mod wire;

pub use config::*;
pub use error::*;
pub use file::*;
pub use interrupt::*;
pub use registry::*;
pub use session::*;
pub use wire::ByteOrder;

pub use handleq_ring::{Capacity, MAX_CAPACITY, MIN_CAPACITY};
