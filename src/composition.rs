//! Decoder for Composition Data Status payloads.
//!
//! A node describes itself with a fixed header followed by one record per
//! element. Each element lists the SIG and vendor models it hosts:
//!
//! ```text
//! page | CID | PID | VID | CRPL | features | element*
//!  u8    u16   u16   u16   u16     u16
//!
//! element = loc u16 | M u8 | V u8 | SIG id u16 * M | (company u16, model u16) * V
//! ```
//!
//! All multi-byte fields are little-endian. Only the page zero layout is
//! understood; the page byte itself is skipped.

use bytes::Buf;
use thiserror::Error;
use tracing::debug;

/// Bytes occupied by the page number and fixed header.
pub const HEADER_LEN: usize = 11;

const ELEMENT_HEADER_LEN: usize = 4;
const SIG_MODEL_LEN: usize = 2;
const VENDOR_MODEL_LEN: usize = 4;

const FEATURE_RELAY: u16 = 1 << 0;
const FEATURE_PROXY: u16 = 1 << 1;
const FEATURE_FRIEND: u16 = 1 << 2;
const FEATURE_LOW_POWER: u16 = 1 << 3;

/// Errors raised while decoding composition data.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CompositionError {
    /// The payload ended before the fixed header was complete.
    #[error("composition data truncated: have {have} bytes, need {need}")]
    Truncated {
        /// Bytes available.
        have: usize,
        /// Bytes required for the header.
        need: usize,
    },
}

/// Optional features a node advertises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Features {
    /// Relay feature supported.
    pub relay: bool,
    /// GATT proxy feature supported.
    pub proxy: bool,
    /// Friend feature supported.
    pub friend: bool,
    /// Low power feature supported.
    pub low_power: bool,
}

impl Features {
    /// Split a feature bitmask into flags. Reserved bits are ignored.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            relay: bits & FEATURE_RELAY != 0,
            proxy: bits & FEATURE_PROXY != 0,
            friend: bits & FEATURE_FRIEND != 0,
            low_power: bits & FEATURE_LOW_POWER != 0,
        }
    }

    /// Recombine the flags into the wire bitmask.
    #[must_use]
    pub const fn to_bits(self) -> u16 {
        let mut bits = 0;
        if self.relay {
            bits |= FEATURE_RELAY;
        }
        if self.proxy {
            bits |= FEATURE_PROXY;
        }
        if self.friend {
            bits |= FEATURE_FRIEND;
        }
        if self.low_power {
            bits |= FEATURE_LOW_POWER;
        }
        bits
    }
}

/// One addressable element of a node and the models it hosts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// GATT namespace location descriptor.
    pub location: u16,
    /// SIG model identifiers.
    pub sig_models: Vec<u32>,
    /// Vendor model identifiers, company id in the high 16 bits.
    pub vendor_models: Vec<u32>,
}

impl Element {
    /// Iterate over every model id, SIG models first.
    pub fn models(&self) -> impl Iterator<Item = u32> + '_ {
        self.sig_models.iter().chain(&self.vendor_models).copied()
    }
}

/// Decoded page-zero composition data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositionData {
    /// Company identifier assigned by the Bluetooth SIG.
    pub company_id: u16,
    /// Vendor-assigned product identifier.
    pub product_id: u16,
    /// Vendor-assigned product version.
    pub version_id: u16,
    /// Minimum number of replay protection list entries.
    pub crpl: u16,
    /// Advertised features.
    pub features: Features,
    /// Elements in address order; the first is the primary element.
    pub elements: Vec<Element>,
}

impl CompositionData {
    /// Borrow the element at `index` (0 is the primary element).
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&Element> { self.elements.get(index) }
}

/// Decode a Composition Data Status payload (the bytes after the opcode).
///
/// Element records are read until the buffer runs out. A record that would
/// need more bytes than remain ends decoding and the leftover bytes are
/// discarded.
///
/// # Errors
///
/// Returns [`CompositionError::Truncated`] when the header is incomplete.
///
/// # Examples
///
/// ```
/// use meshconfig::composition::decode;
///
/// let data = decode(&[
///     0x00, 0x01, 0x00, 0x02, 0x00, 0x01, 0x00, 0x0A, 0x00, 0x01, 0x00, // header
///     0x00, 0x00, 0x01, 0x00, 0x01, 0x10, // element 0
/// ])
/// .expect("valid composition data");
/// assert_eq!(data.company_id, 1);
/// assert!(data.features.relay);
/// assert_eq!(data.elements[0].sig_models, vec![0x1001]);
/// ```
pub fn decode(payload: &[u8]) -> Result<CompositionData, CompositionError> {
    decode_with_remainder(payload).map(|(data, _)| data)
}

/// Decode composition data and report how many trailing bytes were ignored.
///
/// Callers that want to reject malformed element records can treat a
/// non-zero remainder as an error.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with_remainder(payload: &[u8]) -> Result<(CompositionData, usize), CompositionError> {
    if payload.len() < HEADER_LEN {
        return Err(CompositionError::Truncated {
            have: payload.len(),
            need: HEADER_LEN,
        });
    }

    let mut buf = payload;
    let page = buf.get_u8();
    if page != 0 {
        debug!(page, "decoding composition data page as page zero");
    }

    let mut data = CompositionData {
        company_id: buf.get_u16_le(),
        product_id: buf.get_u16_le(),
        version_id: buf.get_u16_le(),
        crpl: buf.get_u16_le(),
        features: Features::from_bits(buf.get_u16_le()),
        elements: Vec::new(),
    };

    while let Some(element) = read_element(&mut buf) {
        data.elements.push(element);
    }

    let remainder = buf.remaining();
    if remainder > 0 {
        debug!(
            remainder,
            elements = data.elements.len(),
            "ignoring trailing composition data bytes"
        );
    }
    Ok((data, remainder))
}

/// Read one element record, leaving `buf` untouched when it is incomplete.
fn read_element(buf: &mut &[u8]) -> Option<Element> {
    let mut cursor = *buf;
    if cursor.remaining() < ELEMENT_HEADER_LEN {
        return None;
    }

    let location = cursor.get_u16_le();
    let sig_count = usize::from(cursor.get_u8());
    let vendor_count = usize::from(cursor.get_u8());
    if cursor.remaining() < sig_count * SIG_MODEL_LEN + vendor_count * VENDOR_MODEL_LEN {
        return None;
    }

    let sig_models = (0..sig_count)
        .map(|_| u32::from(cursor.get_u16_le()))
        .collect();
    let vendor_models = (0..vendor_count)
        .map(|_| {
            let company = u32::from(cursor.get_u16_le());
            let model = u32::from(cursor.get_u16_le());
            (company << 16) | model
        })
        .collect();

    *buf = cursor;
    Some(Element {
        location,
        sig_models,
        vendor_models,
    })
}

#[cfg(test)]
mod tests;
