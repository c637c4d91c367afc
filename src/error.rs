//! Canonical error and result types for the crate.
//!
//! `ConfigError` is the single error surface of the configuration client. It
//! separates admission failures (`Busy`), timeouts reported through the
//! observer, parameters rejected before transmission, and failures passed
//! through from the transport.

use thiserror::Error;

use crate::{command::Command, opcode::OpcodeError, transport::TransportError};

/// Top-level error type exposed by `meshconfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A request expecting the same response from the same node is still
    /// outstanding. Nothing was transmitted.
    #[error("{request} to {address:#06x} refused: a reply from that node is already awaited")]
    Busy {
        /// Request that was refused.
        request: Command,
        /// Destination node.
        address: u16,
    },

    /// The node did not answer before the request timed out.
    #[error("no response from node {address:#06x} to {request}")]
    NoResponseFromNode {
        /// Request that timed out.
        request: Command,
        /// Node that stayed silent.
        address: u16,
    },

    /// A request parameter is outside its permitted range.
    #[error("invalid parameter: {0}")]
    ParamInvalid(&'static str),

    /// The transport failed to hand the message to the mesh.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The request opcode could not be encoded.
    #[error("opcode error: {0}")]
    Opcode(#[from] OpcodeError),
}

impl ConfigError {
    /// Returns true if repeating the same request later may succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// use meshconfig::{ConfigError, command::Command};
    ///
    /// let err = ConfigError::Busy {
    ///     request: Command::AppKeyAdd,
    ///     address: 0x0002,
    /// };
    /// assert!(err.is_retriable());
    /// assert!(!ConfigError::ParamInvalid("ttl").is_retriable());
    /// ```
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Busy { .. } | Self::NoResponseFromNode { .. } | Self::Transport(_)
        )
    }
}

/// Canonical result alias used by `meshconfig` public APIs.
pub type Result<T> = std::result::Result<T, ConfigError>;
