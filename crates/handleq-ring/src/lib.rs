//! Fixed-capacity circular FIFO storage.
//!
//! This crate provides the storage layer for per-session integer queues: a
//! bounded ring that is filled one element at a time and emptied in a single
//! all-or-nothing drain.
//!
//! # Primitives
//!
//! - [`BoundedRing`]: ring buffer over a boxed slice with explicit
//!   head/tail/count bookkeeping
//! - [`Capacity`]: validated slot count in `[MIN_CAPACITY, MAX_CAPACITY]`
//!
//! The ring has no synchronization of its own. Callers that share one across
//! threads wrap it in their own lock.

#![no_std]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod capacity;
pub mod ring;

pub use capacity::{Capacity, MAX_CAPACITY, MIN_CAPACITY};
pub use ring::{AllocError, BoundedRing, RingEmpty, RingFull, RingStatus};
