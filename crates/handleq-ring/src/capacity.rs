use core::fmt;

/// Smallest number of slots a ring may have.
pub const MIN_CAPACITY: u8 = 1;

/// Largest number of slots a ring may have.
pub const MAX_CAPACITY: u8 = 100;

/// Validated ring capacity in `[MIN_CAPACITY, MAX_CAPACITY]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(u8);

impl Capacity {
    /// Validate an arbitrary integer as a capacity.
    pub fn new(slots: i64) -> Option<Self> {
        if (MIN_CAPACITY as i64..=MAX_CAPACITY as i64).contains(&slots) {
            Some(Capacity(slots as u8))
        } else {
            None
        }
    }

    /// Interpret a single signed wire byte as a capacity.
    ///
    /// Bytes above `0x7f` are negative and therefore rejected.
    #[inline]
    pub fn from_wire(byte: i8) -> Option<Self> {
        Self::new(byte as i64)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
