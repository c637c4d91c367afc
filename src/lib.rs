#![doc(html_root_url = "https://docs.rs/meshconfig/latest")]
//! Public API for the `meshconfig` library.
//!
//! This crate implements the access-layer side of a Bluetooth Mesh
//! configuration client: the opcode codec, the composition data decoder, the
//! table that correlates replies with outstanding requests, and the
//! [`ConfigClient`] that ties them to a mesh daemon transport.

pub mod byte_order;
pub mod client;
pub mod command;
pub mod composition;
pub mod config;
pub mod configuration;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod opcode;
pub mod pending;
pub mod transport;

pub use client::{ConfigClient, ConfigClientBuilder};
pub use command::{Command, Response};
pub use composition::{CompositionData, CompositionError, Element, Features};
pub use config::ConfigClientConfig;
pub use configuration::{Configuration, FeatureState, ModelId, RelayRetransmit, StatusCode};
pub use error::{ConfigError, Result};
pub use metrics::{
    INBOUND_DROPPED,
    REQUEST_TIMEOUTS,
    REQUESTS_BUSY,
    REQUESTS_SENT,
    RESPONSES_MATCHED,
};
pub use observer::{ConfigEvent, ConfigObserver};
pub use opcode::{Opcode, OpcodeError};
pub use pending::{CorrelationKey, PendingRequest, PendingRequestTable, Ticket};
pub use transport::{AccessTransport, TransportError};
