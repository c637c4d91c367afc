//! Helpers for explicit byte-order conversions on mesh access payloads.
//!
//! Mesh opcodes are carried in network byte order while every parameter
//! field after the opcode is little-endian. Keeping both directions here
//! scopes the Clippy expectations to the conversion points and keeps the
//! codec code explicit about which order each field uses.

/// Serialise a `u16` in network byte order (big-endian).
///
/// # Examples
///
/// ```
/// use meshconfig::byte_order::write_network_u16;
///
/// assert_eq!(write_network_u16(0x8008), [0x80, 0x08]);
/// ```
#[must_use]
pub fn write_network_u16(value: u16) -> [u8; 2] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Mesh opcodes are transmitted big-endian."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u16` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use meshconfig::byte_order::read_network_u16;
///
/// assert_eq!(read_network_u16([0x80, 0x08]), 0x8008);
/// ```
#[must_use]
pub fn read_network_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Mesh opcodes are transmitted big-endian."
    )]
    u16::from_be_bytes(bytes)
}

/// Serialise the low 24 bits of a `u32` in network byte order.
///
/// Bits above the low 24 are discarded.
///
/// # Examples
///
/// ```
/// use meshconfig::byte_order::write_network_u24;
///
/// assert_eq!(write_network_u24(0x00C0_0102), [0xC0, 0x01, 0x02]);
/// ```
#[must_use]
pub fn write_network_u24(value: u32) -> [u8; 3] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Mesh opcodes are transmitted big-endian."
    )]
    let [_, high, middle, low] = value.to_be_bytes();
    [high, middle, low]
}

/// Parse a 24-bit network-order value.
///
/// # Examples
///
/// ```
/// use meshconfig::byte_order::read_network_u24;
///
/// assert_eq!(read_network_u24([0xC0, 0x01, 0x02]), 0x00C0_0102);
/// ```
#[must_use]
pub fn read_network_u24(bytes: [u8; 3]) -> u32 {
    let [high, middle, low] = bytes;
    #[expect(
        clippy::big_endian_bytes,
        reason = "Mesh opcodes are transmitted big-endian."
    )]
    u32::from_be_bytes([0, high, middle, low])
}

/// Serialise a `u16` parameter field in little-endian order.
///
/// # Examples
///
/// ```
/// use meshconfig::byte_order::write_le_u16;
///
/// assert_eq!(write_le_u16(0x1001), [0x01, 0x10]);
/// ```
#[must_use]
pub fn write_le_u16(value: u16) -> [u8; 2] { value.to_le_bytes() }

/// Parse a little-endian `u16` parameter field.
///
/// # Examples
///
/// ```
/// use meshconfig::byte_order::read_le_u16;
///
/// assert_eq!(read_le_u16([0x01, 0x10]), 0x1001);
/// ```
#[must_use]
pub fn read_le_u16(bytes: [u8; 2]) -> u16 { u16::from_le_bytes(bytes) }

/// Read a little-endian `u16` at `offset`, returning `None` when `data` is
/// too short.
#[must_use]
pub fn le_u16_at(data: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let bytes: [u8; 2] = data.get(offset..end)?.try_into().ok()?;
    Some(read_le_u16(bytes))
}

#[cfg(test)]
mod tests {
    //! Conversion tests for the byte-order helpers.

    use rstest::rstest;

    use super::{
        le_u16_at,
        read_le_u16,
        read_network_u16,
        read_network_u24,
        write_le_u16,
        write_network_u16,
        write_network_u24,
    };

    #[test]
    fn u24_drops_high_byte_and_reads_back() {
        assert_eq!(write_network_u24(0xAAC0_1234), [0xC0, 0x12, 0x34]);
        assert_eq!(read_network_u24([0xC0, 0x12, 0x34]), 0x00C0_1234);
    }

    #[rstest]
    #[case::network(write_network_u16(0x1234), [0x12, 0x34], read_network_u16([0x12, 0x34]))]
    #[case::little_endian(write_le_u16(0x1234), [0x34, 0x12], read_le_u16([0x34, 0x12]))]
    fn u16_conversions_use_expected_order(
        #[case] written: [u8; 2],
        #[case] expected_bytes: [u8; 2],
        #[case] read_back: u16,
    ) {
        assert_eq!(written, expected_bytes);
        assert_eq!(read_back, 0x1234);
    }

    #[rstest]
    #[case::start(&[0x01, 0x02, 0x03], 0, Some(0x0201))]
    #[case::end(&[0x01, 0x02, 0x03], 1, Some(0x0302))]
    #[case::short(&[0x01, 0x02, 0x03], 2, None)]
    #[case::overflow(&[0x01, 0x02], usize::MAX, None)]
    fn le_u16_at_checks_bounds(
        #[case] data: &[u8],
        #[case] offset: usize,
        #[case] expected: Option<u16>,
    ) {
        assert_eq!(le_u16_at(data, offset), expected);
    }
}
