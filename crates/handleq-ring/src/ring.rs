use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::capacity::Capacity;

/// Returned by [`BoundedRing::enqueue`] when every slot is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingFull;

/// Returned by [`BoundedRing::drain_all`] when there is nothing to drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingEmpty;

/// The backing store could not be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for RingFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ring is full")
    }
}

impl fmt::Display for RingEmpty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ring is empty")
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to allocate ring storage")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RingFull {}
#[cfg(feature = "std")]
impl std::error::Error for RingEmpty {}
#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

/// A fixed-capacity FIFO ring.
///
/// `count` is tracked explicitly so that `head == tail` is unambiguous: the
/// ring is empty when `count == 0` and full when `count == capacity`. The
/// live window is `[head, head + count)` modulo capacity; slots outside it
/// hold stale values and are never read.
pub struct BoundedRing<T> {
    storage: Box<[T]>,
    head: usize,
    tail: usize,
    count: usize,
}

impl<T: Copy + Default> BoundedRing<T> {
    /// Allocate a ring with exactly `capacity` default-initialized slots.
    pub fn new(capacity: Capacity) -> Result<Self, AllocError> {
        let slots = capacity.get();
        let mut storage = Vec::new();
        storage.try_reserve_exact(slots).map_err(|_| AllocError)?;
        storage.resize(slots, T::default());

        Ok(Self {
            storage: storage.into_boxed_slice(),
            head: 0,
            tail: 0,
            count: 0,
        })
    }

    /// Append `value` at the tail.
    pub fn enqueue(&mut self, value: T) -> Result<(), RingFull> {
        if self.is_full() {
            return Err(RingFull);
        }

        self.storage[self.tail] = value;
        self.tail = (self.tail + 1) % self.storage.len();
        self.count += 1;
        debug_assert_eq!(self.tail, (self.head + self.count) % self.storage.len());

        Ok(())
    }

    /// Remove every element, oldest first, and reset the ring.
    pub fn drain_all(&mut self) -> Result<Vec<T>, RingEmpty> {
        if self.is_empty() {
            return Err(RingEmpty);
        }

        let capacity = self.storage.len();
        let drained = (0..self.count)
            .map(|i| self.storage[(self.head + i) % capacity])
            .collect();

        self.head = 0;
        self.tail = 0;
        self.count = 0;

        Ok(drained)
    }
}

impl<T> BoundedRing<T> {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.storage.len()
    }

    /// Returns a snapshot of the ring indices.
    pub fn status(&self) -> RingStatus {
        RingStatus {
            head: self.head,
            tail: self.tail,
            len: self.count,
            capacity: self.storage.len(),
        }
    }
}

impl<T> fmt::Debug for BoundedRing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedRing")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("count", &self.count)
            .field("capacity", &self.storage.len())
            .finish()
    }
}

/// Status snapshot of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingStatus {
    pub head: usize,
    pub tail: usize,
    pub len: usize,
    pub capacity: usize,
}
