//! Parameter and result types for configuration messages.
//!
//! Request parameters are validated here before anything reaches the
//! transport; [`Configuration`] carries the decoded content of status
//! messages back to the observer.

use crate::{
    byte_order::{le_u16_at, write_le_u16},
    composition::CompositionData,
    error::{ConfigError, Result},
};

/// Largest valid network or application key index (12 bits).
pub const MAX_KEY_INDEX: u16 = 0x0FFF;

/// Largest default TTL a node accepts.
pub const MAX_TTL: u8 = 0x7F;

/// Application keys are always 128 bits.
pub const APP_KEY_LEN: usize = 16;

const MAX_RETRANSMIT_COUNT: u8 = 0x07;
const RETRANSMIT_STEP_MS: u16 = 10;
const MAX_RETRANSMIT_STEPS: u16 = 0x1F;

/// Status code carried by configuration status messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    /// `0x00`: the request was applied.
    Success,
    /// `0x01`: the element address is unknown.
    InvalidAddress,
    /// `0x02`: the element hosts no such model.
    InvalidModel,
    /// `0x03`: no application key with that index.
    InvalidAppKeyIndex,
    /// `0x04`: no network key with that index.
    InvalidNetKeyIndex,
    /// `0x05`: the node has no room for the new state.
    InsufficientResources,
    /// `0x06`: a different key is stored under that index.
    KeyIndexAlreadyStored,
    /// `0x07`: publication parameters were rejected.
    InvalidPublishParameters,
    /// `0x08`: the model does not support subscriptions.
    NotASubscribeModel,
    /// `0x09`: persistent storage failed.
    StorageFailure,
    /// `0x0A`: the feature is not implemented by the node.
    FeatureNotSupported,
    /// `0x0B`: a key update is not possible in the current phase.
    CannotUpdate,
    /// `0x0C`: the state cannot be removed.
    CannotRemove,
    /// `0x0D`: the key cannot be bound.
    CannotBind,
    /// `0x0E`: the node is busy; retry later.
    TemporarilyUnableToChangeState,
    /// `0x0F`: the state cannot be set.
    CannotSet,
    /// `0x10`: the node reported no specific reason.
    UnspecifiedError,
    /// `0x11`: the application key is bound to another network key.
    InvalidBinding,
    /// A value reserved for future use.
    Reserved(u8),
}

impl StatusCode {
    /// Returns true for [`StatusCode::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool { matches!(self, Self::Success) }
}

impl From<u8> for StatusCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Success,
            0x01 => Self::InvalidAddress,
            0x02 => Self::InvalidModel,
            0x03 => Self::InvalidAppKeyIndex,
            0x04 => Self::InvalidNetKeyIndex,
            0x05 => Self::InsufficientResources,
            0x06 => Self::KeyIndexAlreadyStored,
            0x07 => Self::InvalidPublishParameters,
            0x08 => Self::NotASubscribeModel,
            0x09 => Self::StorageFailure,
            0x0A => Self::FeatureNotSupported,
            0x0B => Self::CannotUpdate,
            0x0C => Self::CannotRemove,
            0x0D => Self::CannotBind,
            0x0E => Self::TemporarilyUnableToChangeState,
            0x0F => Self::CannotSet,
            0x10 => Self::UnspecifiedError,
            0x11 => Self::InvalidBinding,
            other => Self::Reserved(other),
        }
    }
}

/// State of an optional node feature (relay, proxy, friend).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureState {
    /// Supported but switched off.
    Disabled,
    /// Supported and switched on.
    Enabled,
    /// The node does not implement the feature.
    NotSupported,
}

impl FeatureState {
    /// Wire value of a state that may be written to a node.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParamInvalid`] for
    /// [`FeatureState::NotSupported`], which only nodes may report.
    pub fn settable(self) -> Result<u8> {
        match self {
            Self::Disabled => Ok(0x00),
            Self::Enabled => Ok(0x01),
            Self::NotSupported => Err(ConfigError::ParamInvalid(
                "feature state \"not supported\" cannot be set",
            )),
        }
    }
}

impl TryFrom<u8> for FeatureState {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Disabled),
            0x01 => Ok(Self::Enabled),
            0x02 => Ok(Self::NotSupported),
            other => Err(other),
        }
    }
}

/// Identifier of a model hosted on an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelId {
    /// A model defined by the Bluetooth SIG.
    Sig(u16),
    /// A vendor model, qualified by the vendor's company identifier.
    Vendor {
        /// Company identifier.
        company: u16,
        /// Vendor-assigned model identifier.
        model: u16,
    },
}

impl ModelId {
    /// Composite identifier as reported in composition data: vendor models
    /// carry the company id in the high 16 bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use meshconfig::configuration::ModelId;
    ///
    /// assert_eq!(ModelId::Sig(0x1000).as_u32(), 0x1000);
    /// let vendor = ModelId::Vendor { company: 0x0059, model: 0x0001 };
    /// assert_eq!(vendor.as_u32(), 0x0059_0001);
    /// ```
    #[must_use]
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Sig(id) => u32::from(id),
            Self::Vendor { company, model } => (u32::from(company) << 16) | u32::from(model),
        }
    }

    /// Append the little-endian wire form to `dst`.
    pub(crate) fn write(self, dst: &mut Vec<u8>) {
        match self {
            Self::Sig(id) => dst.extend_from_slice(&write_le_u16(id)),
            Self::Vendor { company, model } => {
                dst.extend_from_slice(&write_le_u16(company));
                dst.extend_from_slice(&write_le_u16(model));
            }
        }
    }

    /// Parse a 2-byte SIG or 4-byte vendor model id.
    pub(crate) fn read(bytes: &[u8]) -> Option<Self> {
        match bytes.len() {
            2 => le_u16_at(bytes, 0).map(Self::Sig),
            4 => Some(Self::Vendor {
                company: le_u16_at(bytes, 0)?,
                model: le_u16_at(bytes, 2)?,
            }),
            _ => None,
        }
    }
}

/// Relay retransmission parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayRetransmit {
    /// Number of retransmissions beyond the first transmission (0–7).
    pub count: u8,
    /// Interval between retransmissions in milliseconds: a multiple of 10
    /// between 10 and 320.
    pub interval_ms: u16,
}

impl RelayRetransmit {
    /// Pack into the single retransmit byte: count in the low 3 bits, the
    /// interval step count minus one in the high 5 bits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParamInvalid`] when the count or interval is
    /// out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use meshconfig::configuration::RelayRetransmit;
    ///
    /// let retransmit = RelayRetransmit { count: 2, interval_ms: 20 };
    /// assert_eq!(retransmit.encode().ok(), Some(0x0A));
    /// assert_eq!(RelayRetransmit::decode(0x0A), retransmit);
    /// ```
    pub fn encode(self) -> Result<u8> {
        if self.count > MAX_RETRANSMIT_COUNT {
            return Err(ConfigError::ParamInvalid("relay retransmit count exceeds 7"));
        }
        let steps = self.interval_ms / RETRANSMIT_STEP_MS;
        let aligned = self.interval_ms % RETRANSMIT_STEP_MS == 0;
        if !aligned || !(1..=MAX_RETRANSMIT_STEPS + 1).contains(&steps) {
            return Err(ConfigError::ParamInvalid(
                "relay retransmit interval must be a multiple of 10 ms between 10 and 320",
            ));
        }
        let [encoded_steps, _] = write_le_u16(steps - 1);
        Ok(self.count | (encoded_steps << 3))
    }

    /// Unpack a retransmit byte.
    #[must_use]
    pub fn decode(byte: u8) -> Self {
        let steps = u16::from(byte >> 3) + 1;
        Self {
            count: byte & MAX_RETRANSMIT_COUNT,
            interval_ms: steps * RETRANSMIT_STEP_MS,
        }
    }
}

/// Check a network or application key index.
///
/// # Errors
///
/// Returns [`ConfigError::ParamInvalid`] when `index` needs more than 12 bits.
pub fn check_key_index(index: u16) -> Result<u16> {
    if index > MAX_KEY_INDEX {
        return Err(ConfigError::ParamInvalid("key index exceeds 12 bits"));
    }
    Ok(index)
}

/// Check a default TTL value: 0 or 2 through 127.
///
/// # Errors
///
/// Returns [`ConfigError::ParamInvalid`] for 1 and values above 127.
pub fn check_ttl(ttl: u8) -> Result<u8> {
    match ttl {
        0x00 | 0x02..=MAX_TTL => Ok(ttl),
        _ => Err(ConfigError::ParamInvalid("default TTL must be 0 or 2..=127")),
    }
}

/// Pack a network key index and application key index into three bytes.
pub(crate) fn pack_key_indices(net_idx: u16, app_idx: u16) -> [u8; 3] {
    let [net_low, net_high] = write_le_u16(net_idx);
    let [app_low, app_high] = write_le_u16(app_idx << 4);
    [net_low, (net_high & 0x0F) | app_low, app_high]
}

/// Unpack three bytes into a network and application key index.
pub(crate) fn unpack_key_indices(bytes: &[u8]) -> Option<(u16, u16)> {
    if bytes.len() != 3 {
        return None;
    }
    let net_idx = le_u16_at(bytes, 0)? & MAX_KEY_INDEX;
    let app_idx = le_u16_at(bytes, 1)? >> 4;
    Some((net_idx, app_idx))
}

/// Decoded content of a configuration status message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Configuration {
    /// Composition data page zero.
    Composition(CompositionData),
    /// Default TTL used by the node.
    DefaultTtl(u8),
    /// GATT proxy state.
    GattProxy(FeatureState),
    /// Relay state with its retransmission parameters.
    Relay {
        /// Relay feature state.
        state: FeatureState,
        /// Retransmission parameters.
        retransmit: RelayRetransmit,
    },
    /// Outcome of an application key add, update or delete.
    AppKeyStatus {
        /// Status reported by the node.
        status: StatusCode,
        /// Network key index the application key is bound to.
        net_idx: u16,
        /// Application key index.
        app_idx: u16,
    },
    /// Application keys bound to a network key.
    AppKeyList {
        /// Status reported by the node.
        status: StatusCode,
        /// Network key index that was queried.
        net_idx: u16,
        /// Application key indices.
        app_keys: Vec<u16>,
    },
    /// Outcome of a model to application key bind or unbind.
    ModelApp {
        /// Status reported by the node.
        status: StatusCode,
        /// Element address hosting the model.
        element: u16,
        /// Application key index.
        app_idx: u16,
        /// Model that was (un)bound.
        model: ModelId,
    },
    /// Secure network beacon state.
    Beacon(bool),
    /// Friend feature state.
    Friend(FeatureState),
    /// The node acknowledged a reset and left the network.
    NodeReset,
}

impl Configuration {
    /// Status code carried by the message, if it has one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::AppKeyStatus { status, .. }
            | Self::AppKeyList { status, .. }
            | Self::ModelApp { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0x00, true)]
    #[case(0x01, false)]
    #[case(0x02, true)]
    #[case(0x7F, true)]
    #[case(0x80, false)]
    #[case(0xFF, false)]
    fn ttl_range(#[case] ttl: u8, #[case] valid: bool) {
        assert_eq!(check_ttl(ttl).is_ok(), valid);
    }

    #[test]
    fn key_indices_pack_into_three_bytes() {
        let packed = pack_key_indices(0x0123, 0x0456);
        assert_eq!(packed, [0x23, 0x61, 0x45]);
        assert_eq!(unpack_key_indices(&packed), Some((0x0123, 0x0456)));
    }

    #[test]
    fn key_index_limit_is_twelve_bits() {
        assert!(check_key_index(MAX_KEY_INDEX).is_ok());
        assert!(matches!(
            check_key_index(0x1000),
            Err(ConfigError::ParamInvalid(_))
        ));
    }

    #[rstest]
    #[case::min(RelayRetransmit { count: 0, interval_ms: 10 }, 0x00)]
    #[case::max(RelayRetransmit { count: 7, interval_ms: 320 }, 0xFF)]
    #[case::mixed(RelayRetransmit { count: 3, interval_ms: 50 }, 0x23)]
    fn relay_retransmit_packing(#[case] retransmit: RelayRetransmit, #[case] byte: u8) {
        assert_eq!(retransmit.encode().ok(), Some(byte));
        assert_eq!(RelayRetransmit::decode(byte), retransmit);
    }

    #[rstest]
    #[case::count(RelayRetransmit { count: 8, interval_ms: 10 })]
    #[case::zero_interval(RelayRetransmit { count: 0, interval_ms: 0 })]
    #[case::unaligned(RelayRetransmit { count: 0, interval_ms: 15 })]
    #[case::too_long(RelayRetransmit { count: 0, interval_ms: 330 })]
    fn relay_retransmit_rejects_out_of_range(#[case] retransmit: RelayRetransmit) {
        assert!(matches!(
            retransmit.encode(),
            Err(ConfigError::ParamInvalid(_))
        ));
    }

    #[test]
    fn not_supported_cannot_be_set() {
        assert_eq!(FeatureState::Enabled.settable().ok(), Some(1));
        assert!(FeatureState::NotSupported.settable().is_err());
        assert_eq!(FeatureState::try_from(0x03), Err(0x03));
    }

    #[rstest]
    #[case(&[0x00, 0x10], Some(ModelId::Sig(0x1000)))]
    #[case(&[0x59, 0x00, 0x01, 0x00], Some(ModelId::Vendor { company: 0x0059, model: 0x0001 }))]
    #[case(&[0x00, 0x10, 0x00], None)]
    fn model_id_wire_form(#[case] bytes: &[u8], #[case] expected: Option<ModelId>) {
        assert_eq!(ModelId::read(bytes), expected);
        if let Some(model) = expected {
            let mut written = Vec::new();
            model.write(&mut written);
            assert_eq!(written, bytes);
        }
    }

    #[test]
    fn reserved_status_codes_are_preserved() {
        assert_eq!(StatusCode::from(0x42), StatusCode::Reserved(0x42));
        assert!(StatusCode::from(0x00).is_success());
    }
}
