//! Encoding and decoding of Bluetooth Mesh access-layer opcodes.
//!
//! Every access message starts with a 1, 2 or 3 byte opcode. The two most
//! significant bits of the first byte select the width:
//!
//! | Prefix | Width | Range |
//! |--------|-------|-------|
//! | `0x`   | 1     | `0x00..=0x7E` (`0x7F` is reserved) |
//! | `10`   | 2     | `0x8000..=0xBFFF` |
//! | `11`   | 3     | `0xC0_0000..=0xFF_FFFF` (vendor) |
//!
//! The codec is stateless and never reads past the end of the supplied
//! buffer.

use bytes::{BufMut, BytesMut};
use thiserror::Error;
use tracing::warn;

use crate::byte_order::{read_network_u16, read_network_u24, write_network_u24};

/// Flag marking an opcode as unacknowledged. It is masked off before any
/// opcode comparison.
pub const UNRELIABLE_FLAG: u32 = 0x0100;

/// The single reserved one-byte opcode.
pub const RESERVED_OPCODE: u8 = 0x7F;

/// Largest opcode that still fits in the 3-byte vendor encoding.
pub const MAX_OPCODE: u32 = 0x00FF_FFFF;

/// A mesh access-layer opcode.
///
/// # Examples
///
/// ```
/// use meshconfig::opcode::Opcode;
///
/// let op = Opcode::new(0x8008);
/// assert_eq!(op.width(), Some(2));
/// assert_eq!(Opcode::new(0x8108).reliable(), op);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode(u32);

impl Opcode {
    /// Wrap a raw opcode value.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    /// Return the opcode with the unreliable flag cleared.
    #[must_use]
    pub const fn reliable(self) -> Self { Self(self.0 & !UNRELIABLE_FLAG) }

    /// Number of bytes this opcode occupies on the wire, or `None` when the
    /// value lies outside every encodable range.
    #[must_use]
    pub const fn width(self) -> Option<usize> {
        match self.0 {
            0x00..=0x7E => Some(1),
            0x8000..=0xBFFF => Some(2),
            0x00C0_0000..=MAX_OPCODE => Some(3),
            _ => None,
        }
    }
}

impl From<u32> for Opcode {
    fn from(value: u32) -> Self { Self(value) }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Errors raised by the opcode codec.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum OpcodeError {
    /// The access payload carried no bytes at all.
    #[error("access payload is empty")]
    Empty,

    /// The first byte is the reserved one-byte opcode.
    #[error("reserved opcode {0:#04x}")]
    Reserved(u8),

    /// The buffer ended before the opcode width implied by its prefix.
    #[error("truncated opcode: have {have} bytes, need {need}")]
    Truncated {
        /// Bytes available in the buffer.
        have: usize,
        /// Bytes required by the opcode prefix.
        need: usize,
    },

    /// The value does not fall in any of the three encodable ranges.
    #[error("opcode {0:#x} is outside every encodable range")]
    OutOfRange(u32),
}

/// Decode the opcode at the start of `buf`.
///
/// Returns the opcode and the number of bytes it occupied.
///
/// # Errors
///
/// Returns [`OpcodeError`] when `buf` is empty, starts with the reserved
/// opcode, or is shorter than the width announced by its first byte.
///
/// # Examples
///
/// ```
/// use meshconfig::opcode::{Opcode, decode};
///
/// assert_eq!(decode(&[0x80, 0x08, 0xFF]), Ok((Opcode::new(0x8008), 2)));
/// assert!(decode(&[0xC1, 0x00]).is_err());
/// ```
pub fn decode(buf: &[u8]) -> Result<(Opcode, usize), OpcodeError> {
    let Some(&first) = buf.first() else {
        return Err(OpcodeError::Empty);
    };

    match first >> 6 {
        0b00 | 0b01 if first == RESERVED_OPCODE => Err(OpcodeError::Reserved(first)),
        0b00 | 0b01 => Ok((Opcode(u32::from(first)), 1)),
        0b10 => {
            let bytes = leading::<2>(buf)?;
            Ok((Opcode(u32::from(read_network_u16(bytes))), 2))
        }
        _ => {
            let bytes = leading::<3>(buf)?;
            Ok((Opcode(read_network_u24(bytes)), 3))
        }
    }
}

/// Encode `opcode` into a freshly allocated buffer.
///
/// # Errors
///
/// Returns [`OpcodeError::OutOfRange`] for values outside the three
/// encodable ranges.
///
/// # Examples
///
/// ```
/// use meshconfig::opcode::{Opcode, encode};
///
/// assert_eq!(encode(Opcode::new(0x02)), Ok(vec![0x02]));
/// assert_eq!(encode(Opcode::new(0x803D)), Ok(vec![0x80, 0x3D]));
/// assert_eq!(encode(Opcode::new(0x00C1_0203)), Ok(vec![0xC1, 0x02, 0x03]));
/// assert!(encode(Opcode::new(0x7F)).is_err());
/// ```
pub fn encode(opcode: Opcode) -> Result<Vec<u8>, OpcodeError> {
    let mut buf = BytesMut::with_capacity(3);
    encode_into(opcode, &mut buf)?;
    Ok(buf.to_vec())
}

/// Append the wire form of `opcode` to `dst`, returning the bytes written.
///
/// Nothing is written when the opcode is rejected.
///
/// # Errors
///
/// Returns [`OpcodeError::OutOfRange`] for values outside the three
/// encodable ranges.
pub fn encode_into(opcode: Opcode, dst: &mut BytesMut) -> Result<usize, OpcodeError> {
    let value = opcode.get();
    match opcode.width() {
        Some(1) => {
            let [.., byte] = write_network_u24(value);
            dst.put_u8(byte);
            Ok(1)
        }
        Some(2) => {
            let [_, high, low] = write_network_u24(value);
            dst.put_slice(&[high, low]);
            Ok(2)
        }
        Some(_) => {
            dst.put_slice(&write_network_u24(value));
            Ok(3)
        }
        None => {
            warn!(opcode = value, "refusing to encode opcode outside every range");
            Err(OpcodeError::OutOfRange(value))
        }
    }
}

fn leading<const N: usize>(buf: &[u8]) -> Result<[u8; N], OpcodeError> {
    buf.get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(OpcodeError::Truncated {
            have: buf.len(),
            need: N,
        })
}
