//! Payload encoding for submit and drain.
//!
//! - capacity: exactly one signed byte
//! - element: exactly four bytes, a signed 32-bit integer in the configured
//!   [`ByteOrder`] (little-endian unless configured otherwise)
//!
//! Drained output is a concatenation of whole elements, oldest first.

use bytes::{BufMut, BytesMut};

use crate::error::QueueError;

/// Size of the capacity-setting payload.
pub const CAPACITY_WIRE_SIZE: usize = 1;

/// Size of one encoded queue element.
pub const ELEMENT_WIRE_SIZE: usize = size_of::<i32>();

/// Byte order of encoded queue elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
    /// Whatever the host uses; only meaningful when both ends share a machine.
    Native,
}

impl ByteOrder {
    pub fn decode(self, raw: [u8; ELEMENT_WIRE_SIZE]) -> i32 {
        match self {
            ByteOrder::Little => i32::from_le_bytes(raw),
            ByteOrder::Big => i32::from_be_bytes(raw),
            ByteOrder::Native => i32::from_ne_bytes(raw),
        }
    }

    pub fn encode(self, value: i32) -> [u8; ELEMENT_WIRE_SIZE] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Native => value.to_ne_bytes(),
        }
    }

    pub fn put(self, buf: &mut BytesMut, value: i32) {
        match self {
            ByteOrder::Little => buf.put_i32_le(value),
            ByteOrder::Big => buf.put_i32(value),
            ByteOrder::Native => buf.put_i32_ne(value),
        }
    }
}

impl std::str::FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "little" | "le" => Ok(ByteOrder::Little),
            "big" | "be" => Ok(ByteOrder::Big),
            "native" | "ne" => Ok(ByteOrder::Native),
            other => Err(format!("unknown byte order: {other}")),
        }
    }
}

/// Extract the raw capacity byte from a capacity-setting payload.
pub fn capacity_byte(payload: &[u8]) -> Result<i8, QueueError> {
    match payload {
        [byte] => Ok(*byte as i8),
        _ => Err(QueueError::InvalidArgumentSize {
            expected: CAPACITY_WIRE_SIZE,
            actual: payload.len(),
        }),
    }
}

/// Decode one element from an enqueue payload.
pub fn element(payload: &[u8], order: ByteOrder) -> Result<i32, QueueError> {
    let raw: [u8; ELEMENT_WIRE_SIZE] =
        payload.try_into().map_err(|_| QueueError::InvalidArgumentSize {
            expected: ELEMENT_WIRE_SIZE,
            actual: payload.len(),
        })?;
    Ok(order.decode(raw))
}

/// Encode a sequence of elements.
pub fn encode_elements(values: &[i32], order: ByteOrder) -> BytesMut {
    let mut buf = BytesMut::with_capacity(values.len() * ELEMENT_WIRE_SIZE);
    for &value in values {
        order.put(&mut buf, value);
    }
    buf
}
